use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{integer_field, string_field, ContentEntity, FieldMap};
use crate::database::entities::files;
use crate::errors::{CoreError, CoreResult};
use crate::files::DEFAULT_MIME_TYPE;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileStatus {
    /// Not referenced by any content yet.
    Temporary,
    Permanent,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Temporary => "temporary",
            FileStatus::Permanent => "permanent",
        }
    }

    pub fn from_flag(flag: i64) -> Self {
        if flag == 0 {
            FileStatus::Temporary
        } else {
            FileStatus::Permanent
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "temporary" => Some(FileStatus::Temporary),
            "permanent" => Some(FileStatus::Permanent),
            _ => None,
        }
    }
}

/// Metadata record of a stored file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileEntity {
    pub id: Option<i32>,
    pub owner_id: Option<i32>,
    pub status: FileStatus,
    pub filename: String,
    pub uri: String,
    pub size_bytes: i64,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
}

impl FileEntity {
    fn set_field(&mut self, field: &str, value: Value) -> CoreResult<()> {
        match field {
            "uid" => {
                self.owner_id = integer_field(Self::ENTITY_TYPE, field, value)?
                    .map(i32::try_from)
                    .transpose()
                    .map_err(|_| CoreError::internal("Field 'uid' on file is out of range"))?
            }
            "status" => {
                self.status =
                    FileStatus::from_flag(integer_field(Self::ENTITY_TYPE, field, value)?.unwrap_or(0))
            }
            "filename" => self.filename = string_field(Self::ENTITY_TYPE, field, value)?,
            "uri" => self.uri = string_field(Self::ENTITY_TYPE, field, value)?,
            "filesize" => {
                self.size_bytes = integer_field(Self::ENTITY_TYPE, field, value)?.unwrap_or(0)
            }
            "filemime" => self.mime_type = string_field(Self::ENTITY_TYPE, field, value)?,
            other => return Err(CoreError::unknown_field(Self::ENTITY_TYPE, other)),
        }
        Ok(())
    }
}

impl ContentEntity for FileEntity {
    const ENTITY_TYPE: &'static str = "file";

    fn id(&self) -> Option<i32> {
        self.id
    }

    fn bundle(&self) -> &str {
        // Files have a single bundle named after the type.
        Self::ENTITY_TYPE
    }

    fn owner_id(&self) -> Option<i32> {
        self.owner_id
    }

    fn with_fields(_bundle: &str, owner_id: Option<i32>, fields: FieldMap) -> CoreResult<Self> {
        let mut file = FileEntity {
            id: None,
            owner_id,
            status: FileStatus::Temporary,
            filename: String::new(),
            uri: String::new(),
            size_bytes: 0,
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            created_at: Utc::now(),
        };
        file.set_fields(fields)?;
        Ok(file)
    }

    fn set_fields(&mut self, fields: FieldMap) -> CoreResult<()> {
        for (field, value) in fields {
            self.set_field(&field, value)?;
        }
        Ok(())
    }
}

impl From<files::Model> for FileEntity {
    fn from(model: files::Model) -> Self {
        Self {
            id: Some(model.id),
            owner_id: model.owner_id,
            status: FileStatus::parse(&model.status).unwrap_or(FileStatus::Temporary),
            filename: model.filename,
            uri: model.uri,
            size_bytes: model.filesize,
            mime_type: model.filemime,
            created_at: model.created_at,
        }
    }
}

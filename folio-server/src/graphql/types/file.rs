use async_graphql::*;
use chrono::{DateTime, Utc};

use folio::content::{self, FileEntity};

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum FileStatus {
    Temporary,
    Permanent,
}

impl From<content::FileStatus> for FileStatus {
    fn from(status: content::FileStatus) -> Self {
        match status {
            content::FileStatus::Temporary => FileStatus::Temporary,
            content::FileStatus::Permanent => FileStatus::Permanent,
        }
    }
}

/// A managed file record.
#[derive(SimpleObject, Clone, Debug)]
#[graphql(name = "File")]
pub struct FileObject {
    pub id: String,
    pub filename: String,
    pub uri: String,
    /// Size in bytes
    pub filesize: i64,
    pub filemime: String,
    pub status: FileStatus,
    #[graphql(name = "ownerId")]
    pub owner_id: Option<i32>,
    pub created: DateTime<Utc>,
}

impl From<FileEntity> for FileObject {
    fn from(file: FileEntity) -> Self {
        Self {
            id: file.id.map(|id| id.to_string()).unwrap_or_default(),
            filename: file.filename,
            uri: file.uri,
            filesize: file.size_bytes,
            filemime: file.mime_type,
            status: FileStatus::from(file.status),
            owner_id: file.owner_id,
            created: file.created_at,
        }
    }
}

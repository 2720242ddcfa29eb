use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{string_field, ContentEntity, FieldMap};
use crate::database::entities::nodes;
use crate::errors::{CoreError, CoreResult};

/// Formatted long text: the stored value plus its text format.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyField {
    pub value: String,
    pub format: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: Option<i32>,
    pub bundle: String,
    pub title: String,
    pub body: BodyField,
    pub owner_id: Option<i32>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Node {
    fn set_field(&mut self, field: &str, value: Value) -> CoreResult<()> {
        match field {
            "title" => self.title = string_field(Self::ENTITY_TYPE, field, value)?,
            "body" => self.body = body_field(value, self.body.format.take())?,
            "status" => {
                self.published = match value {
                    Value::Bool(published) => published,
                    Value::Number(number) => number.as_i64().unwrap_or(0) != 0,
                    Value::Null => false,
                    other => {
                        return Err(CoreError::internal(format!(
                            "Field 'status' on node expects a boolean, got {}",
                            other
                        )))
                    }
                }
            }
            other => return Err(CoreError::unknown_field(Self::ENTITY_TYPE, other)),
        }
        Ok(())
    }
}

/// Accepts either a bare string (the value) or `{value, format}`.
fn body_field(value: Value, current_format: Option<String>) -> CoreResult<BodyField> {
    match value {
        Value::Object(mut object) => {
            let value = string_field("node", "body.value", object.remove("value").unwrap_or(Value::Null))?;
            let format = match object.remove("format") {
                Some(Value::String(format)) => Some(format),
                _ => current_format,
            };
            Ok(BodyField { value, format })
        }
        other => Ok(BodyField {
            value: string_field("node", "body", other)?,
            format: current_format,
        }),
    }
}

impl ContentEntity for Node {
    const ENTITY_TYPE: &'static str = "node";

    fn id(&self) -> Option<i32> {
        self.id
    }

    fn bundle(&self) -> &str {
        &self.bundle
    }

    fn owner_id(&self) -> Option<i32> {
        self.owner_id
    }

    fn with_fields(bundle: &str, owner_id: Option<i32>, fields: FieldMap) -> CoreResult<Self> {
        let now = Utc::now();
        let mut node = Node {
            id: None,
            bundle: bundle.to_string(),
            title: String::new(),
            body: BodyField::default(),
            owner_id,
            published: true,
            created_at: now,
            updated_at: now,
        };
        node.set_fields(fields)?;
        Ok(node)
    }

    fn set_fields(&mut self, fields: FieldMap) -> CoreResult<()> {
        for (field, value) in fields {
            self.set_field(&field, value)?;
        }
        Ok(())
    }
}

impl From<nodes::Model> for Node {
    fn from(model: nodes::Model) -> Self {
        Self {
            id: Some(model.id),
            bundle: model.bundle,
            title: model.title,
            body: BodyField {
                value: model.body_value,
                format: model.body_format,
            },
            owner_id: model.owner_id,
            published: model.published,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

//! Domain entities the mutation resolvers operate on.
//!
//! Entities are built and patched from a [`FieldMap`], the persistence-field
//! view produced by field extractors. Each kind decides how a raw JSON value
//! lands in its typed fields.

mod file;
mod node;

use std::collections::BTreeMap;

use serde_json::Value;

use crate::errors::{CoreError, CoreResult};

pub use file::{FileEntity, FileStatus};
pub use node::{BodyField, Node};

/// Persistence field name to raw value.
pub type FieldMap = BTreeMap<String, Value>;

pub trait ContentEntity: Clone + Send + Sync + 'static {
    /// Entity type identifier, e.g. `node` or `file`.
    const ENTITY_TYPE: &'static str;

    fn id(&self) -> Option<i32>;

    fn bundle(&self) -> &str;

    fn owner_id(&self) -> Option<i32>;

    /// Builds a new, unsaved entity.
    fn with_fields(bundle: &str, owner_id: Option<i32>, fields: FieldMap) -> CoreResult<Self>;

    /// Overwrites exactly the fields present in `fields`.
    fn set_fields(&mut self, fields: FieldMap) -> CoreResult<()>;
}

pub(crate) fn string_field(entity_type: &str, field: &str, value: Value) -> CoreResult<String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(value) => Ok(value),
        other => Err(CoreError::internal(format!(
            "Field '{}' on {} expects a string, got {}",
            field, entity_type, other
        ))),
    }
}

pub(crate) fn integer_field(entity_type: &str, field: &str, value: Value) -> CoreResult<Option<i64>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => number.as_i64().map(Some).ok_or_else(|| {
            CoreError::internal(format!(
                "Field '{}' on {} expects an integer, got {}",
                field, entity_type, number
            ))
        }),
        other => Err(CoreError::internal(format!(
            "Field '{}' on {} expects an integer, got {}",
            field, entity_type, other
        ))),
    }
}

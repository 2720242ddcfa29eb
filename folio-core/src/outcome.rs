use serde::{Deserialize, Serialize};

/// A structured validation failure attributable to one field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub path: String,
    pub message: String,
    pub code: Option<String>,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Result envelope every mutation resolves to.
///
/// A successful outcome carries the entity; a failed one carries either
/// violations (entity validation) or errors (access, lookup, transfer and
/// storage failures), never both, and never an entity.
#[derive(Clone, Debug, PartialEq)]
pub struct CrudOutcome<E> {
    pub entity: Option<E>,
    pub violations: Vec<Violation>,
    pub errors: Vec<String>,
}

impl<E> CrudOutcome<E> {
    pub fn success(entity: E) -> Self {
        Self {
            entity: Some(entity),
            violations: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn violations(violations: Vec<Violation>) -> Self {
        Self {
            entity: None,
            violations,
            errors: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            entity: None,
            violations: Vec::new(),
            errors: vec![message.into()],
        }
    }

    pub fn is_success(&self) -> bool {
        self.entity.is_some()
    }
}

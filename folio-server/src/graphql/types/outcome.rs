use async_graphql::*;

use folio::content::{FileEntity, Node};
use folio::{CrudOutcome, Violation};

use super::article::NodeArticle;
use super::file::FileObject;

#[derive(Union, Clone, Debug)]
pub enum Entity {
    NodeArticle(NodeArticle),
    File(FileObject),
}

#[derive(SimpleObject, Clone, Debug)]
pub struct ConstraintViolation {
    pub message: String,
    /// Property path of the offending field
    pub path: String,
    pub code: Option<String>,
}

impl From<Violation> for ConstraintViolation {
    fn from(violation: Violation) -> Self {
        Self {
            message: violation.message,
            path: violation.path,
            code: violation.code,
        }
    }
}

/// Result of a create, update, delete or upload mutation.
///
/// `entity` is set only on success. Violations and errors are never both
/// populated by the same call.
#[derive(SimpleObject, Clone, Debug)]
pub struct EntityCrudOutput {
    pub entity: Option<Entity>,
    pub violations: Vec<ConstraintViolation>,
    pub errors: Vec<String>,
}

impl EntityCrudOutput {
    fn from_outcome<E>(outcome: CrudOutcome<E>, wrap: impl FnOnce(E) -> Entity) -> Self {
        Self {
            entity: outcome.entity.map(wrap),
            violations: outcome
                .violations
                .into_iter()
                .map(ConstraintViolation::from)
                .collect(),
            errors: outcome.errors,
        }
    }
}

impl From<CrudOutcome<Node>> for EntityCrudOutput {
    fn from(outcome: CrudOutcome<Node>) -> Self {
        Self::from_outcome(outcome, |node| Entity::NodeArticle(NodeArticle::from(node)))
    }
}

impl From<CrudOutcome<FileEntity>> for EntityCrudOutput {
    fn from(outcome: CrudOutcome<FileEntity>) -> Self {
        Self::from_outcome(outcome, |file| Entity::File(FileObject::from(file)))
    }
}

//! Persistence collaborator for the mutation resolvers.

mod sea_orm_store;

use async_trait::async_trait;

use crate::auth::{Actor, Operation};
use crate::content::{ContentEntity, FieldMap};
use crate::errors::CoreResult;
use crate::outcome::Violation;

pub use sea_orm_store::SeaOrmEntityStore;

/// What a save did to storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveStatus {
    Created,
    Updated,
    Unchanged,
}

/// Create/load/save/delete plus access and validation for one entity kind.
#[async_trait]
pub trait EntityStore<E: ContentEntity>: Send + Sync {
    async fn load(&self, id: i32) -> CoreResult<Option<E>>;

    /// Builds an unsaved entity owned by `actor`. Nothing is written.
    fn create(&self, bundle: &str, fields: FieldMap, actor: &Actor) -> CoreResult<E>;

    /// Persists `entity`, refreshing it with stored values (id, timestamps).
    async fn save(&self, entity: &mut E) -> CoreResult<SaveStatus>;

    async fn delete(&self, entity: &E) -> CoreResult<()>;

    fn check_access(&self, entity: &E, operation: Operation, actor: &Actor) -> bool;

    async fn validate(&self, entity: &E) -> CoreResult<Vec<Violation>>;
}

/// Entity ids travel as strings through GraphQL.
pub fn parse_id(id: &str) -> Option<i32> {
    id.trim().parse::<i32>().ok().filter(|id| *id > 0)
}

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::auth::{Actor, Operation};
use crate::content::{ContentEntity, FieldMap};
use crate::errors::CoreResult;
use crate::outcome::CrudOutcome;
use crate::store::{parse_id, EntityStore, SaveStatus};

/// Maps one entity kind's mutation input onto persistence fields.
pub trait FieldExtractor: Send + Sync {
    type Input: Send;

    fn extract_for_create(&self, input: Self::Input) -> FieldMap;

    /// Only fields in the returned map are written.
    fn extract_for_update(&self, input: Self::Input) -> FieldMap;
}

/// Create, update and delete for one entity type and bundle.
///
/// Every expected failure (missing entity, access denial, violations) comes
/// back as a [`CrudOutcome`]; only store failures surface as `Err`.
pub struct EntityMutationResolver<E: ContentEntity, X: FieldExtractor> {
    store: Arc<dyn EntityStore<E>>,
    extractor: X,
    bundle: String,
}

impl<E: ContentEntity, X: FieldExtractor> EntityMutationResolver<E, X> {
    pub fn new(store: Arc<dyn EntityStore<E>>, extractor: X, bundle: impl Into<String>) -> Self {
        Self {
            store,
            extractor,
            bundle: bundle.into(),
        }
    }

    pub fn bundle(&self) -> &str {
        &self.bundle
    }

    pub async fn create(&self, actor: &Actor, input: X::Input) -> CoreResult<CrudOutcome<E>> {
        let fields = self.extractor.extract_for_create(input);
        let mut entity = self.store.create(&self.bundle, fields, actor)?;

        if !self.store.check_access(&entity, Operation::Create, actor) {
            warn!(
                "Create of {}:{} denied for user {:?}",
                E::ENTITY_TYPE,
                self.bundle,
                actor.user_id
            );
            return Ok(CrudOutcome::error(
                "You do not have the necessary permissions to create entities of this type.",
            ));
        }

        let violations = self.store.validate(&entity).await?;
        if !violations.is_empty() {
            debug!(
                "Create of {}:{} failed validation with {} violation(s)",
                E::ENTITY_TYPE,
                self.bundle,
                violations.len()
            );
            return Ok(CrudOutcome::violations(violations));
        }

        match self.store.save(&mut entity).await? {
            SaveStatus::Created => {
                info!("Created {} {:?}", E::ENTITY_TYPE, entity.id());
                Ok(CrudOutcome::success(entity))
            }
            status => {
                warn!("Create of {} reported {:?}", E::ENTITY_TYPE, status);
                Ok(CrudOutcome::error("The entity could not be saved."))
            }
        }
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        input: X::Input,
    ) -> CoreResult<CrudOutcome<E>> {
        let mut entity = match self.load_target(id).await? {
            Ok(entity) => entity,
            Err(rejected) => return Ok(rejected),
        };

        let fields = self.extractor.extract_for_update(input);

        if !self.store.check_access(&entity, Operation::Update, actor) {
            warn!(
                "Update of {} {} denied for user {:?}",
                E::ENTITY_TYPE,
                id,
                actor.user_id
            );
            return Ok(CrudOutcome::error(format!(
                "You do not have the necessary permissions to update this {}.",
                self.bundle
            )));
        }

        debug!(
            "Updating {} {} fields {:?}",
            E::ENTITY_TYPE,
            id,
            fields.keys().collect::<Vec<_>>()
        );
        entity.set_fields(fields)?;

        let violations = self.store.validate(&entity).await?;
        if !violations.is_empty() {
            return Ok(CrudOutcome::violations(violations));
        }

        let status = self.store.save(&mut entity).await?;
        info!("Saved {} {} ({:?})", E::ENTITY_TYPE, id, status);
        Ok(CrudOutcome::success(entity))
    }

    pub async fn delete(&self, actor: &Actor, id: &str) -> CoreResult<CrudOutcome<E>> {
        let entity = match self.load_target(id).await? {
            Ok(entity) => entity,
            Err(rejected) => return Ok(rejected),
        };

        if !self.store.check_access(&entity, Operation::Delete, actor) {
            warn!(
                "Delete of {} {} denied for user {:?}",
                E::ENTITY_TYPE,
                id,
                actor.user_id
            );
            return Ok(CrudOutcome::error(format!(
                "You do not have the necessary permissions to delete this {}.",
                self.bundle
            )));
        }

        // The response describes what was deleted
        let snapshot = entity.clone();
        if let Err(err) = self.store.delete(&entity).await {
            warn!("Delete of {} {} failed: {}", E::ENTITY_TYPE, id, err);
            return Ok(CrudOutcome::error(format!(
                "Entity deletion failed with exception: {}",
                err.message()
            )));
        }

        info!("Deleted {} {}", E::ENTITY_TYPE, id);
        Ok(CrudOutcome::success(snapshot))
    }

    /// Loads `id` and checks it belongs to this resolver's bundle. The inner
    /// `Err` is the outcome to hand back when it does not.
    async fn load_target(&self, id: &str) -> CoreResult<Result<E, CrudOutcome<E>>> {
        let loaded = match parse_id(id) {
            Some(id) => self.store.load(id).await?,
            None => None,
        };

        let Some(entity) = loaded else {
            debug!("{} {} not found", E::ENTITY_TYPE, id);
            return Ok(Err(CrudOutcome::error(format!(
                "The requested {} could not be loaded.",
                self.bundle
            ))));
        };

        if entity.bundle() != self.bundle {
            return Ok(Err(CrudOutcome::error(format!(
                "The requested entity is not of the expected type {}.",
                self.bundle
            ))));
        }

        Ok(Ok(entity))
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use tracing::debug;

use super::{EntityStore, SaveStatus};
use crate::auth::{AccessPolicy, AccessTarget, Actor, Operation};
use crate::content::{ContentEntity, FieldMap, FileEntity, Node};
use crate::database::entities::{files, nodes};
use crate::errors::{CoreError, CoreResult};
use crate::outcome::Violation;
use crate::validation;

/// [`EntityStore`] for nodes and files backed by sea-orm.
#[derive(Clone)]
pub struct SeaOrmEntityStore {
    db: DatabaseConnection,
    access: Arc<dyn AccessPolicy>,
    default_body_format: Option<String>,
}

impl SeaOrmEntityStore {
    pub fn new(db: DatabaseConnection, access: Arc<dyn AccessPolicy>) -> Self {
        Self {
            db,
            access,
            default_body_format: None,
        }
    }

    /// Text format given to new node bodies that do not name one.
    pub fn with_default_body_format(mut self, format: impl Into<String>) -> Self {
        self.default_body_format = Some(format.into());
        self
    }

    fn check<E: ContentEntity>(&self, entity: &E, operation: Operation, actor: &Actor) -> bool {
        self.access.check(
            actor,
            AccessTarget {
                entity_type: E::ENTITY_TYPE,
                bundle: entity.bundle(),
                owner_id: entity.owner_id(),
            },
            operation,
        )
    }
}

#[async_trait]
impl EntityStore<Node> for SeaOrmEntityStore {
    async fn load(&self, id: i32) -> CoreResult<Option<Node>> {
        let model = nodes::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Node::from))
    }

    fn create(&self, bundle: &str, fields: FieldMap, actor: &Actor) -> CoreResult<Node> {
        let mut node = Node::with_fields(bundle, actor.user_id, fields)?;
        if node.body.format.is_none() {
            node.body.format = self.default_body_format.clone();
        }
        Ok(node)
    }

    async fn save(&self, node: &mut Node) -> CoreResult<SaveStatus> {
        let Some(id) = node.id else {
            let model = nodes::ActiveModel {
                bundle: Set(node.bundle.clone()),
                title: Set(node.title.clone()),
                body_value: Set(node.body.value.clone()),
                body_format: Set(node.body.format.clone()),
                owner_id: Set(node.owner_id),
                published: Set(node.published),
                ..nodes::ActiveModel::new()
            }
            .insert(&self.db)
            .await?;

            debug!("Inserted node {} ({})", model.id, model.bundle);
            *node = Node::from(model);
            return Ok(SaveStatus::Created);
        };

        let existing = nodes::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found(Node::ENTITY_TYPE, id.to_string()))?;

        let mut active: nodes::ActiveModel = existing.clone().into();
        if existing.title != node.title {
            active.title = Set(node.title.clone());
        }
        if existing.body_value != node.body.value {
            active.body_value = Set(node.body.value.clone());
        }
        if existing.body_format != node.body.format {
            active.body_format = Set(node.body.format.clone());
        }
        if existing.owner_id != node.owner_id {
            active.owner_id = Set(node.owner_id);
        }
        if existing.published != node.published {
            active.published = Set(node.published);
        }

        if !active.is_changed() {
            return Ok(SaveStatus::Unchanged);
        }

        let model = active.set_updated_at().update(&self.db).await?;
        debug!("Updated node {}", model.id);
        *node = Node::from(model);
        Ok(SaveStatus::Updated)
    }

    async fn delete(&self, node: &Node) -> CoreResult<()> {
        let id = node
            .id
            .ok_or_else(|| CoreError::internal("Cannot delete a node that was never saved"))?;
        let result = nodes::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(CoreError::not_found(Node::ENTITY_TYPE, id.to_string()));
        }
        Ok(())
    }

    fn check_access(&self, node: &Node, operation: Operation, actor: &Actor) -> bool {
        self.check(node, operation, actor)
    }

    async fn validate(&self, node: &Node) -> CoreResult<Vec<Violation>> {
        Ok(validation::validate_node(node))
    }
}

#[async_trait]
impl EntityStore<FileEntity> for SeaOrmEntityStore {
    async fn load(&self, id: i32) -> CoreResult<Option<FileEntity>> {
        let model = files::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(FileEntity::from))
    }

    fn create(&self, bundle: &str, fields: FieldMap, actor: &Actor) -> CoreResult<FileEntity> {
        FileEntity::with_fields(bundle, actor.user_id, fields)
    }

    async fn save(&self, file: &mut FileEntity) -> CoreResult<SaveStatus> {
        let now = Utc::now();
        let Some(id) = file.id else {
            let model = files::ActiveModel {
                owner_id: Set(file.owner_id),
                filename: Set(file.filename.clone()),
                uri: Set(file.uri.clone()),
                filemime: Set(file.mime_type.clone()),
                filesize: Set(file.size_bytes),
                status: Set(file.status.as_str().to_string()),
                created_at: Set(file.created_at),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&self.db)
            .await?;

            debug!("Inserted file {} at {}", model.id, model.uri);
            *file = FileEntity::from(model);
            return Ok(SaveStatus::Created);
        };

        let existing = files::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found(FileEntity::ENTITY_TYPE, id.to_string()))?;

        let mut active: files::ActiveModel = existing.clone().into();
        if existing.filename != file.filename {
            active.filename = Set(file.filename.clone());
        }
        if existing.uri != file.uri {
            active.uri = Set(file.uri.clone());
        }
        if existing.filemime != file.mime_type {
            active.filemime = Set(file.mime_type.clone());
        }
        if existing.filesize != file.size_bytes {
            active.filesize = Set(file.size_bytes);
        }
        if existing.status != file.status.as_str() {
            active.status = Set(file.status.as_str().to_string());
        }
        if existing.owner_id != file.owner_id {
            active.owner_id = Set(file.owner_id);
        }

        if !active.is_changed() {
            return Ok(SaveStatus::Unchanged);
        }

        active.updated_at = Set(now);
        let model = active.update(&self.db).await?;
        *file = FileEntity::from(model);
        Ok(SaveStatus::Updated)
    }

    async fn delete(&self, file: &FileEntity) -> CoreResult<()> {
        let id = file
            .id
            .ok_or_else(|| CoreError::internal("Cannot delete a file that was never saved"))?;
        let result = files::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(CoreError::not_found(FileEntity::ENTITY_TYPE, id.to_string()));
        }
        Ok(())
    }

    fn check_access(&self, file: &FileEntity, operation: Operation, actor: &Actor) -> bool {
        self.check(file, operation, actor)
    }

    async fn validate(&self, file: &FileEntity) -> CoreResult<Vec<Violation>> {
        let mut violations = validation::validate_file(file);

        if !file.uri.is_empty() {
            let mut query = files::Entity::find().filter(files::Column::Uri.eq(file.uri.as_str()));
            if let Some(id) = file.id {
                query = query.filter(files::Column::Id.ne(id));
            }
            if query.count(&self.db).await? > 0 {
                violations.push(validation::uri_not_unique(&file.uri));
            }
        }

        Ok(violations)
    }
}

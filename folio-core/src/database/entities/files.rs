use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// File metadata. The bytes live on disk under the path the `uri` resolves to.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "files")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub owner_id: Option<i32>,
    pub filename: String,
    #[sea_orm(unique)]
    pub uri: String,
    pub filemime: String,
    pub filesize: i64,
    /// temporary or permanent
    pub status: String,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

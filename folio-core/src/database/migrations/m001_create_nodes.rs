use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Nodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Nodes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Nodes::Bundle).string().not_null())
                    .col(ColumnDef::new(Nodes::Title).string().not_null())
                    .col(
                        ColumnDef::new(Nodes::BodyValue)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Nodes::BodyFormat).string())
                    .col(ColumnDef::new(Nodes::OwnerId).integer())
                    .col(
                        ColumnDef::new(Nodes::Published)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Nodes::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Nodes::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_nodes_bundle")
                    .table(Nodes::Table)
                    .col(Nodes::Bundle)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Nodes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Nodes {
    Table,
    Id,
    Bundle,
    Title,
    BodyValue,
    BodyFormat,
    OwnerId,
    Published,
    CreatedAt,
    UpdatedAt,
}

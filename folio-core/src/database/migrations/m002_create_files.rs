use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Files::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Files::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Files::OwnerId).integer())
                    .col(ColumnDef::new(Files::Filename).string().not_null())
                    .col(
                        ColumnDef::new(Files::Uri)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Files::Filemime)
                            .string()
                            .not_null()
                            .default("application/octet-stream"),
                    )
                    .col(ColumnDef::new(Files::Filesize).big_integer().not_null())
                    .col(
                        ColumnDef::new(Files::Status)
                            .string()
                            .not_null()
                            .default("temporary"),
                    )
                    .col(ColumnDef::new(Files::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Files::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Files::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Files {
    Table,
    Id,
    OwnerId,
    Filename,
    Uri,
    Filemime,
    Filesize,
    Status,
    CreatedAt,
    UpdatedAt,
}

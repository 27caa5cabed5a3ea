//! Migration to create the achievements catalogue.
//!
//! Achievement names are unique so awards can upsert by name.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Achievements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Achievements::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Achievements::Name)
                            .text()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Achievements::Description).text().not_null())
                    .col(ColumnDef::new(Achievements::Category).text().not_null())
                    .col(
                        ColumnDef::new(Achievements::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Achievements::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Achievements {
    Table,
    Id,
    Name,
    Description,
    Category,
    CreatedAt,
}

//! Migration to create the jobs table.
//!
//! Each row is one tracked application. `holiday_applied` is stamped at
//! creation time when the application was logged on a holiday.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Jobs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Jobs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Jobs::UserId).uuid().not_null())
                    .col(ColumnDef::new(Jobs::Company).text().not_null())
                    .col(ColumnDef::new(Jobs::Title).text().not_null())
                    .col(
                        ColumnDef::new(Jobs::Status)
                            .text()
                            .not_null()
                            .default("APPLIED"),
                    )
                    .col(ColumnDef::new(Jobs::HolidayApplied).text().null())
                    .col(
                        ColumnDef::new(Jobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Jobs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_jobs_user_id")
                            .from(Jobs::Table, Jobs::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Weekly and lifetime counts both filter on (user_id, created_at)
        manager
            .create_index(
                Index::create()
                    .name("idx_jobs_user_created_at")
                    .table(Jobs::Table)
                    .col(Jobs::UserId)
                    .col(Jobs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_jobs_user_created_at").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Jobs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Jobs {
    Table,
    Id,
    UserId,
    Company,
    Title,
    Status,
    HolidayApplied,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

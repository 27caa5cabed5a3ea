//! Migration to create the interviews table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Interviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Interviews::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Interviews::UserId).uuid().not_null())
                    .col(ColumnDef::new(Interviews::JobId).uuid().null())
                    .col(
                        ColumnDef::new(Interviews::AcceptedDate)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Interviews::InterviewDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Interviews::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_interviews_user_id")
                            .from(Interviews::Table, Interviews::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_interviews_job_id")
                            .from(Interviews::Table, Interviews::JobId)
                            .to(Jobs::Table, Jobs::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_interviews_user_id")
                    .table(Interviews::Table)
                    .col(Interviews::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_interviews_user_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Interviews::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Interviews {
    Table,
    Id,
    UserId,
    JobId,
    AcceptedDate,
    InterviewDate,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Jobs {
    Table,
    Id,
}

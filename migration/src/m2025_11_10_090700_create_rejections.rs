//! Migration to create the rejections table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rejections::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rejections::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rejections::UserId).uuid().not_null())
                    .col(ColumnDef::new(Rejections::JobId).uuid().not_null())
                    .col(
                        ColumnDef::new(Rejections::Date)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Rejections::InitiatedBy).text().not_null())
                    .col(ColumnDef::new(Rejections::Notes).text().null())
                    .col(
                        ColumnDef::new(Rejections::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Rejections::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rejections_user_id")
                            .from(Rejections::Table, Rejections::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rejections_job_id")
                            .from(Rejections::Table, Rejections::JobId)
                            .to(Jobs::Table, Jobs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rejections_job_id_unique")
                    .table(Rejections::Table)
                    .col(Rejections::JobId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rejections_user_id")
                    .table(Rejections::Table)
                    .col(Rejections::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rejections::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Rejections {
    Table,
    Id,
    UserId,
    JobId,
    Date,
    InitiatedBy,
    Notes,
    CreatedAt,
    UpdatedAt,
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

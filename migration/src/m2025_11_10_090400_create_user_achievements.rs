//! Migration to create the user_achievements join table.
//!
//! The unique `(user_id, achievement_id)` index turns concurrent duplicate
//! awards into a no-op insert instead of a second row.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserAchievements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserAchievements::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserAchievements::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(UserAchievements::AchievementId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserAchievements::AwardedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_achievements_user_id")
                            .from(UserAchievements::Table, UserAchievements::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_achievements_achievement_id")
                            .from(UserAchievements::Table, UserAchievements::AchievementId)
                            .to(Achievements::Table, Achievements::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_achievements_user_achievement")
                    .table(UserAchievements::Table)
                    .col(UserAchievements::UserId)
                    .col(UserAchievements::AchievementId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_user_achievements_user_achievement")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(UserAchievements::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserAchievements {
    Table,
    Id,
    UserId,
    AchievementId,
    AwardedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Achievements {
    Table,
    Id,
}

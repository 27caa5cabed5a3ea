//! Migration to create the users table.
//!
//! Users carry their goal settings and the persisted weekly streak counter.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).text().not_null().unique_key())
                    .col(ColumnDef::new(Users::Name).text().null())
                    .col(
                        ColumnDef::new(Users::JobsAppliedToDaysPerWeekGoal)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Users::JobsAppliedToWeeklyGoalMin)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Users::JobsAppliedToWeeklyGoalMax)
                            .integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Users::MonthlyInterviewGoal).integer().null())
                    .col(ColumnDef::new(Users::CandidateGoal).text().null())
                    .col(
                        ColumnDef::new(Users::OfferReceivedByDateGoal)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Users::OfferReceivedByDateGoalStart)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Users::OfferReceivedByDateGoalEnd)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Users::WeeklyStreak)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Users::LastStreakUpdate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
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
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    Name,
    JobsAppliedToDaysPerWeekGoal,
    JobsAppliedToWeeklyGoalMin,
    JobsAppliedToWeeklyGoalMax,
    MonthlyInterviewGoal,
    CandidateGoal,
    OfferReceivedByDateGoal,
    OfferReceivedByDateGoalStart,
    OfferReceivedByDateGoalEnd,
    WeeklyStreak,
    LastStreakUpdate,
    CreatedAt,
}

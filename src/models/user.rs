//! User entity model
//!
//! Users own jobs and interviews, hold their goal settings, and carry the
//! persisted weekly streak counter.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub email: String,

    pub name: Option<String>,

    /// Distinct application days per week the user aims for (0..=7)
    pub jobs_applied_to_days_per_week_goal: Option<i32>,

    pub jobs_applied_to_weekly_goal_min: Option<i32>,

    pub jobs_applied_to_weekly_goal_max: Option<i32>,

    pub monthly_interview_goal: Option<i32>,

    pub candidate_goal: Option<CandidateGoal>,

    pub offer_received_by_date_goal: Option<DateTimeWithTimeZone>,

    pub offer_received_by_date_goal_start: Option<DateTimeWithTimeZone>,

    pub offer_received_by_date_goal_end: Option<DateTimeWithTimeZone>,

    /// Consecutive weeks the days-per-week goal has been met
    pub weekly_streak: i32,

    /// Start of the week in which `weekly_streak` was last advanced
    pub last_streak_update: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,
}

/// Career goal a candidate selected during onboarding
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum CandidateGoal {
    #[sea_orm(string_value = "ChangeMyCareer")]
    ChangeMyCareer,
    #[sea_orm(string_value = "GrowInMyExistingRole")]
    GrowInMyExistingRole,
    #[sea_orm(string_value = "ExploreNewOpportunities")]
    ExploreNewOpportunities,
    #[sea_orm(string_value = "ImproveSkillset")]
    ImproveSkillset,
    #[sea_orm(string_value = "LookingForANewJob")]
    LookingForANewJob,
    #[sea_orm(string_value = "ReceiveAnOffer")]
    ReceiveAnOffer,
    #[sea_orm(string_value = "NotSureYet")]
    NotSureYet,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::job::Entity")]
    Job,
    #[sea_orm(has_many = "super::interview::Entity")]
    Interview,
    #[sea_orm(has_many = "super::user_achievement::Entity")]
    UserAchievement,
}

impl Related<super::job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Job.def()
    }
}

impl Related<super::interview::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Interview.def()
    }
}

impl Related<super::user_achievement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserAchievement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Job entity model
//!
//! One row per tracked application. Only rows whose status is not `SAVED`
//! count as "applied" for achievements and streaks.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub user_id: Uuid,

    pub company: String,

    pub title: String,

    pub status: ApplicationStatus,

    /// Name of the holiday the application was logged on, if any
    pub holiday_applied: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

/// Board column a tracked job sits in
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    Default,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    #[sea_orm(string_value = "SAVED")]
    Saved,
    #[sea_orm(string_value = "APPLIED")]
    #[default]
    Applied,
    #[sea_orm(string_value = "INTERVIEW")]
    Interview,
    #[sea_orm(string_value = "OFFER")]
    Offer,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

impl ApplicationStatus {
    /// Whether a job in this status counts as submitted
    pub fn is_applied(self) -> bool {
        self != ApplicationStatus::Saved
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

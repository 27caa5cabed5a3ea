//! Achievement catalogue entity
//!
//! Definitions are created on first award and looked up by their unique name.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "achievements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub name: String,

    pub description: String,

    pub category: AchievementCategory,

    pub created_at: DateTimeWithTimeZone,
}

/// Which response bucket an achievement belongs to
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    #[sea_orm(string_value = "job")]
    Job,
    #[sea_orm(string_value = "interview")]
    Interview,
    #[sea_orm(string_value = "holiday")]
    Holiday,
    #[sea_orm(string_value = "streak")]
    Streak,
}

impl AchievementCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            AchievementCategory::Job => "job",
            AchievementCategory::Interview => "interview",
            AchievementCategory::Holiday => "holiday",
            AchievementCategory::Streak => "streak",
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_achievement::Entity")]
    UserAchievement,
}

impl Related<super::user_achievement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserAchievement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Achievement repository: catalogue upserts, conflict-tolerant award joins
//! and the per-user awarded catalogue.

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::achievement::{self, AchievementCategory, Entity as Achievement};
use crate::models::user_achievement::{self, Entity as UserAchievement};

/// An achievement the user has been awarded, as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AwardedAchievement {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: AchievementCategory,
    pub awarded_at: DateTime<FixedOffset>,
}

/// Repository for achievement database operations
#[derive(Debug, Clone)]
pub struct AchievementRepository {
    db: Arc<DatabaseConnection>,
}

impl AchievementRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<achievement::Model>, DbErr> {
        Achievement::find()
            .filter(achievement::Column::Name.eq(name))
            .one(&*self.db)
            .await
    }

    /// Returns the catalogue entry named `name`, creating it on first use.
    ///
    /// An existing definition keeps its original description.
    pub async fn upsert_definition(
        &self,
        name: &str,
        description: &str,
        category: AchievementCategory,
    ) -> Result<achievement::Model, DbErr> {
        let model = achievement::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            category: Set(category),
            created_at: Set(Utc::now().fixed_offset()),
        };

        Achievement::insert(model)
            .on_conflict(
                OnConflict::column(achievement::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&*self.db)
            .await?;

        self.find_by_name(name)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("achievement '{name}'")))
    }

    /// Links an achievement to a user. Returns `false` when the pair already
    /// existed, so concurrent or repeated awards are harmless.
    pub async fn award(
        &self,
        user_id: Uuid,
        achievement_id: Uuid,
        awarded_at: DateTime<FixedOffset>,
    ) -> Result<bool, DbErr> {
        let model = user_achievement::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            achievement_id: Set(achievement_id),
            awarded_at: Set(awarded_at.with_timezone(&Utc).fixed_offset()),
        };

        let inserted = UserAchievement::insert(model)
            .on_conflict(
                OnConflict::columns([
                    user_achievement::Column::UserId,
                    user_achievement::Column::AchievementId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&*self.db)
            .await?;

        Ok(inserted > 0)
    }

    /// Everything the user has been awarded, oldest award first.
    pub async fn awarded_for_user(&self, user_id: Uuid) -> Result<Vec<AwardedAchievement>, DbErr> {
        let rows = UserAchievement::find()
            .filter(user_achievement::Column::UserId.eq(user_id))
            .order_by_asc(user_achievement::Column::AwardedAt)
            .find_also_related(Achievement)
            .all(&*self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(award, definition)| {
                definition.map(|definition| AwardedAchievement {
                    id: definition.id,
                    name: definition.name,
                    description: definition.description,
                    category: definition.category,
                    awarded_at: award.awarded_at,
                })
            })
            .collect())
    }
}

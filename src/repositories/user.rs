//! User repository: lookups, goal settings and the persisted weekly streak.

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::goals::GoalUpdate;
use crate::models::user::{self, Entity as User};

/// Repository for user database operations
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<user::Model>, DbErr> {
        User::find_by_id(id).one(&*self.db).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, DbErr> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(&*self.db)
            .await
    }

    /// Creates a user with no goals and a zero streak.
    pub async fn create(&self, email: &str, name: Option<String>) -> Result<user::Model, DbErr> {
        user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.to_string()),
            name: Set(name),
            jobs_applied_to_days_per_week_goal: Set(None),
            jobs_applied_to_weekly_goal_min: Set(None),
            jobs_applied_to_weekly_goal_max: Set(None),
            monthly_interview_goal: Set(None),
            candidate_goal: Set(None),
            offer_received_by_date_goal: Set(None),
            offer_received_by_date_goal_start: Set(None),
            offer_received_by_date_goal_end: Set(None),
            weekly_streak: Set(0),
            last_streak_update: Set(None),
            created_at: Set(Utc::now().fixed_offset()),
        }
        .insert(&*self.db)
        .await
    }

    /// Stores a new streak value stamped with the week it was earned in.
    pub async fn record_streak(
        &self,
        user_id: Uuid,
        weekly_streak: i32,
        week_start: DateTime<FixedOffset>,
    ) -> Result<(), DbErr> {
        let model = user::ActiveModel {
            id: Set(user_id),
            weekly_streak: Set(weekly_streak),
            last_streak_update: Set(Some(week_start.with_timezone(&Utc).fixed_offset())),
            ..Default::default()
        };
        model.update(&*self.db).await?;
        Ok(())
    }

    /// Applies a validated goal change set.
    pub async fn update_goals(
        &self,
        user: user::Model,
        update: &GoalUpdate,
    ) -> Result<user::Model, DbErr> {
        let mut model = user.into_active_model();

        if let Some(days) = update.days_per_week {
            model.jobs_applied_to_days_per_week_goal = Set(Some(days));
        }
        if let Some((min, max)) = update.weekly_range {
            model.jobs_applied_to_weekly_goal_min = Set(Some(min));
            model.jobs_applied_to_weekly_goal_max = Set(Some(max));
        }
        if let Some(monthly) = update.monthly_interviews {
            model.monthly_interview_goal = Set(Some(monthly));
        }
        if let Some(goal) = update.candidate_goal {
            model.candidate_goal = Set(Some(goal));
        }
        if let Some(deadline) = update.offer_received_by {
            model.offer_received_by_date_goal = Set(Some(deadline));
        }
        match update.offer_range {
            Some((start, end)) => {
                model.offer_received_by_date_goal_start = Set(Some(start));
                model.offer_received_by_date_goal_end = Set(Some(end));
                model.offer_received_by_date_goal = Set(None);
            }
            None => {
                model.offer_received_by_date_goal_start = Set(None);
                model.offer_received_by_date_goal_end = Set(None);
            }
        }

        model.update(&*self.db).await
    }
}

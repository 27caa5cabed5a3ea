//! Interview repository.

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::interview::{self, Entity as Interview};

/// Repository for interview database operations
#[derive(Debug, Clone)]
pub struct InterviewRepository {
    db: Arc<DatabaseConnection>,
}

impl InterviewRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        job_id: Option<Uuid>,
        accepted_date: DateTime<FixedOffset>,
        interview_date: Option<DateTime<FixedOffset>>,
    ) -> Result<interview::Model, DbErr> {
        interview::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            job_id: Set(job_id),
            accepted_date: Set(accepted_date.with_timezone(&Utc).fixed_offset()),
            interview_date: Set(interview_date.map(|d| d.with_timezone(&Utc).fixed_offset())),
            created_at: Set(Utc::now().fixed_offset()),
        }
        .insert(&*self.db)
        .await
    }

    /// Interviews that have a scheduled date, in acceptance order.
    pub async fn scheduled_for_user(&self, user_id: Uuid) -> Result<Vec<interview::Model>, DbErr> {
        Interview::find()
            .filter(interview::Column::UserId.eq(user_id))
            .filter(interview::Column::InterviewDate.is_not_null())
            .order_by_asc(interview::Column::AcceptedDate)
            .all(&*self.db)
            .await
    }

    /// Number of interviews whose date falls within `[start, end]`.
    pub async fn count_scheduled_between(
        &self,
        user_id: Uuid,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<u64, DbErr> {
        Interview::find()
            .filter(interview::Column::UserId.eq(user_id))
            .filter(interview::Column::InterviewDate.gte(start.with_timezone(&Utc).fixed_offset()))
            .filter(interview::Column::InterviewDate.lte(end.with_timezone(&Utc).fixed_offset()))
            .count(&*self.db)
            .await
    }

    /// Jobs of the user that have at least one interview logged against them.
    pub async fn interviewed_job_ids(&self, user_id: Uuid) -> Result<HashSet<Uuid>, DbErr> {
        Ok(Interview::find()
            .filter(interview::Column::UserId.eq(user_id))
            .filter(interview::Column::JobId.is_not_null())
            .all(&*self.db)
            .await?
            .into_iter()
            .filter_map(|interview| interview.job_id)
            .collect())
    }
}

//! Job repository: application logging and the applied-jobs queries the
//! achievement pipeline and trackers read.

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::job::{self, ApplicationStatus, Entity as Job};

/// Repository for job database operations
#[derive(Debug, Clone)]
pub struct JobRepository {
    db: Arc<DatabaseConnection>,
}

/// Fields for a newly logged application.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub user_id: Uuid,
    pub company: String,
    pub title: String,
    pub status: ApplicationStatus,
    pub holiday_applied: Option<String>,
    pub created_at: DateTime<FixedOffset>,
}

impl JobRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn create(&self, job: NewJob) -> Result<job::Model, DbErr> {
        let created_at = job.created_at.with_timezone(&Utc).fixed_offset();
        job::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(job.user_id),
            company: Set(job.company),
            title: Set(job.title),
            status: Set(job.status),
            holiday_applied: Set(job.holiday_applied),
            created_at: Set(created_at),
            updated_at: Set(created_at),
        }
        .insert(&*self.db)
        .await
    }

    /// Every job the user has actually applied to (status other than `SAVED`),
    /// oldest first.
    pub async fn applied_jobs(&self, user_id: Uuid) -> Result<Vec<job::Model>, DbErr> {
        Job::find()
            .filter(job::Column::UserId.eq(user_id))
            .filter(job::Column::Status.ne(ApplicationStatus::Saved))
            .order_by_asc(job::Column::CreatedAt)
            .all(&*self.db)
            .await
    }

    /// Applied jobs created within `[start, end]`, oldest first.
    pub async fn applied_between(
        &self,
        user_id: Uuid,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<Vec<job::Model>, DbErr> {
        Job::find()
            .filter(job::Column::UserId.eq(user_id))
            .filter(job::Column::Status.ne(ApplicationStatus::Saved))
            .filter(job::Column::CreatedAt.gte(start.with_timezone(&Utc).fixed_offset()))
            .filter(job::Column::CreatedAt.lte(end.with_timezone(&Utc).fixed_offset()))
            .order_by_asc(job::Column::CreatedAt)
            .all(&*self.db)
            .await
    }

    /// Jobs in any of `statuses` created within `[start, end]`.
    pub async fn with_status_between(
        &self,
        user_id: Uuid,
        statuses: &[ApplicationStatus],
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<Vec<job::Model>, DbErr> {
        Job::find()
            .filter(job::Column::UserId.eq(user_id))
            .filter(job::Column::Status.is_in(statuses.iter().copied()))
            .filter(job::Column::CreatedAt.gte(start.with_timezone(&Utc).fixed_offset()))
            .filter(job::Column::CreatedAt.lte(end.with_timezone(&Utc).fixed_offset()))
            .order_by_asc(job::Column::CreatedAt)
            .all(&*self.db)
            .await
    }

    pub async fn find_for_user(
        &self,
        user_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<job::Model>, DbErr> {
        Job::find_by_id(job_id)
            .filter(job::Column::UserId.eq(user_id))
            .one(&*self.db)
            .await
    }

    /// Moves a job owned by `user_id` to `status`. Returns `None` when the job
    /// does not exist or belongs to someone else.
    pub async fn update_status(
        &self,
        user_id: Uuid,
        job_id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Option<job::Model>, DbErr> {
        let Some(existing) = self.find_for_user(user_id, job_id).await? else {
            return Ok(None);
        };

        let mut model = existing.into_active_model();
        model.status = Set(status);
        model.updated_at = Set(Utc::now().fixed_offset());
        model.update(&*self.db).await.map(Some)
    }
}

//! Rejection repository. Every query is scoped to the owning user.

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    ModelTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::job::{self, Entity as Job};
use crate::models::rejection::{self, Entity as Rejection, RejectionInitiator};

/// The editable part of a rejection.
#[derive(Debug, Clone)]
pub struct RejectionFields {
    pub date: DateTime<FixedOffset>,
    pub initiated_by: RejectionInitiator,
    /// `None` leaves stored notes untouched on update
    pub notes: Option<String>,
}

/// Repository for rejection database operations
#[derive(Debug, Clone)]
pub struct RejectionRepository {
    db: Arc<DatabaseConnection>,
}

impl RejectionRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        job_id: Uuid,
        fields: RejectionFields,
    ) -> Result<rejection::Model, DbErr> {
        let now = Utc::now().fixed_offset();
        rejection::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            job_id: Set(job_id),
            date: Set(fields.date.with_timezone(&Utc).fixed_offset()),
            initiated_by: Set(fields.initiated_by),
            notes: Set(fields.notes),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await
    }

    /// The user's rejections with their jobs, most recent first.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<(rejection::Model, Option<job::Model>)>, DbErr> {
        Rejection::find()
            .find_also_related(Job)
            .filter(rejection::Column::UserId.eq(user_id))
            .order_by_desc(rejection::Column::Date)
            .all(&*self.db)
            .await
    }

    pub async fn find_for_user(
        &self,
        user_id: Uuid,
        rejection_id: Uuid,
    ) -> Result<Option<(rejection::Model, Option<job::Model>)>, DbErr> {
        Rejection::find_by_id(rejection_id)
            .find_also_related(Job)
            .filter(rejection::Column::UserId.eq(user_id))
            .one(&*self.db)
            .await
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        rejection_id: Uuid,
        fields: RejectionFields,
    ) -> Result<Option<rejection::Model>, DbErr> {
        let Some(existing) = Rejection::find_by_id(rejection_id)
            .filter(rejection::Column::UserId.eq(user_id))
            .one(&*self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut model = existing.into_active_model();
        model.date = Set(fields.date.with_timezone(&Utc).fixed_offset());
        model.initiated_by = Set(fields.initiated_by);
        if let Some(notes) = fields.notes {
            model.notes = Set(Some(notes));
        }
        model.updated_at = Set(Utc::now().fixed_offset());
        model.update(&*self.db).await.map(Some)
    }

    /// Returns whether a rejection was removed.
    pub async fn delete(&self, user_id: Uuid, rejection_id: Uuid) -> Result<bool, DbErr> {
        let Some(existing) = Rejection::find_by_id(rejection_id)
            .filter(rejection::Column::UserId.eq(user_id))
            .one(&*self.db)
            .await?
        else {
            return Ok(false);
        };
        Ok(existing.delete(&*self.db).await?.rows_affected > 0)
    }
}

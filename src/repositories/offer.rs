//! Offer repository. Every query is scoped to the owning user.

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    ModelTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::job::{self, Entity as Job};
use crate::models::offer::{self, Entity as Offer};

/// The editable part of an offer.
#[derive(Debug, Clone)]
pub struct OfferFields {
    pub offer_date: DateTime<FixedOffset>,
    pub offer_deadline: DateTime<FixedOffset>,
    pub salary: String,
}

/// Repository for offer database operations
#[derive(Debug, Clone)]
pub struct OfferRepository {
    db: Arc<DatabaseConnection>,
}

impl OfferRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Records an offer for `job_id`. A second offer for the same job fails
    /// with a unique violation.
    pub async fn create(
        &self,
        user_id: Uuid,
        job_id: Uuid,
        fields: OfferFields,
    ) -> Result<offer::Model, DbErr> {
        let now = Utc::now().fixed_offset();
        offer::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            job_id: Set(job_id),
            offer_date: Set(fields.offer_date.with_timezone(&Utc).fixed_offset()),
            offer_deadline: Set(fields.offer_deadline.with_timezone(&Utc).fixed_offset()),
            salary: Set(fields.salary),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await
    }

    /// The user's offers with their jobs, earliest offer first.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<(offer::Model, Option<job::Model>)>, DbErr> {
        Offer::find()
            .find_also_related(Job)
            .filter(offer::Column::UserId.eq(user_id))
            .order_by_asc(offer::Column::OfferDate)
            .all(&*self.db)
            .await
    }

    pub async fn find_for_user(
        &self,
        user_id: Uuid,
        offer_id: Uuid,
    ) -> Result<Option<(offer::Model, Option<job::Model>)>, DbErr> {
        Offer::find_by_id(offer_id)
            .find_also_related(Job)
            .filter(offer::Column::UserId.eq(user_id))
            .one(&*self.db)
            .await
    }

    /// Replaces the offer's fields. `None` when the offer does not exist or
    /// belongs to someone else.
    pub async fn update(
        &self,
        user_id: Uuid,
        offer_id: Uuid,
        fields: OfferFields,
    ) -> Result<Option<offer::Model>, DbErr> {
        let Some(existing) = Offer::find_by_id(offer_id)
            .filter(offer::Column::UserId.eq(user_id))
            .one(&*self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut model = existing.into_active_model();
        model.offer_date = Set(fields.offer_date.with_timezone(&Utc).fixed_offset());
        model.offer_deadline = Set(fields.offer_deadline.with_timezone(&Utc).fixed_offset());
        model.salary = Set(fields.salary);
        model.updated_at = Set(Utc::now().fixed_offset());
        model.update(&*self.db).await.map(Some)
    }

    /// Returns whether an offer was removed.
    pub async fn delete(&self, user_id: Uuid, offer_id: Uuid) -> Result<bool, DbErr> {
        let Some(existing) = Offer::find_by_id(offer_id)
            .filter(offer::Column::UserId.eq(user_id))
            .one(&*self.db)
            .await?
        else {
            return Ok(false);
        };
        Ok(existing.delete(&*self.db).await?.rows_affected > 0)
    }
}

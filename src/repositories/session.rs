//! Session repository. Only SHA-256 digests of bearer tokens are stored.

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::session::{self, Entity as Session};

/// Repository for session database operations
#[derive(Debug, Clone)]
pub struct SessionRepository {
    db: Arc<DatabaseConnection>,
}

impl SessionRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        token_hash: String,
        expires_at: DateTime<FixedOffset>,
    ) -> Result<session::Model, DbErr> {
        session::ActiveModel {
            token_hash: Set(token_hash),
            user_id: Set(user_id),
            expires_at: Set(expires_at.with_timezone(&Utc).fixed_offset()),
            created_at: Set(Utc::now().fixed_offset()),
        }
        .insert(&*self.db)
        .await
    }

    /// Looks up a session by token digest, ignoring expired ones.
    pub async fn find_active(
        &self,
        token_hash: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<Option<session::Model>, DbErr> {
        Session::find_by_id(token_hash.to_string())
            .filter(session::Column::ExpiresAt.gt(now.with_timezone(&Utc).fixed_offset()))
            .one(&*self.db)
            .await
    }
}

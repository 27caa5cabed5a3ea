//! Test utilities for database testing.
//!
//! In-memory SQLite databases with migrations applied, plus fixture helpers
//! for users, applications and interviews.

#![allow(dead_code)]

use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use std::sync::Arc;
use uuid::Uuid;

use job_tracker::achievements::AchievementService;
use job_tracker::achievements::holidays::HolidayCalendars;
use job_tracker::cache::QueryCaches;
use job_tracker::clock::{Clock, FixedClock};
use job_tracker::config::CacheConfig;
use job_tracker::goals::GoalUpdate;
use job_tracker::models::{ApplicationStatus, job, user};
use job_tracker::repositories::{InterviewRepository, JobRepository, NewJob, UserRepository};

/// Sets up an in-memory SQLite database with all migrations applied.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;

    Migrator::up(&db, None).await?;

    // Fixtures insert interviews without a backing job row.
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "PRAGMA foreign_keys = OFF".to_string(),
    ))
    .await?;

    Ok(db)
}

/// Sets up an in-memory SQLite database and returns it behind an Arc.
pub async fn setup_test_db_arc() -> Result<Arc<DatabaseConnection>> {
    Ok(Arc::new(setup_test_db().await?))
}

pub fn at(rfc3339: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(rfc3339).expect("valid RFC 3339 fixture")
}

/// A service over `db` whose clock is frozen at `now`.
pub fn service_at(db: &Arc<DatabaseConnection>, now: &str) -> AchievementService {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(at(now)));
    AchievementService::new(
        Arc::clone(db),
        QueryCaches::new(&CacheConfig::default()),
        Arc::new(HolidayCalendars::new()),
        clock,
    )
}

/// Creates a user with an optional days-per-week goal.
pub async fn create_user(
    db: &Arc<DatabaseConnection>,
    days_per_week_goal: Option<i32>,
) -> Result<user::Model> {
    let users = UserRepository::new(Arc::clone(db));
    let user = users
        .create(&format!("{}@example.com", Uuid::new_v4()), None)
        .await?;

    if days_per_week_goal.is_none() {
        return Ok(user);
    }
    let update = GoalUpdate {
        days_per_week: days_per_week_goal,
        ..Default::default()
    };
    Ok(users.update_goals(user, &update).await?)
}

/// Inserts one applied job per timestamp.
pub async fn insert_applied_jobs(
    db: &Arc<DatabaseConnection>,
    user_id: Uuid,
    timestamps: &[&str],
) -> Result<Vec<job::Model>> {
    insert_jobs(db, user_id, ApplicationStatus::Applied, timestamps).await
}

pub async fn insert_jobs(
    db: &Arc<DatabaseConnection>,
    user_id: Uuid,
    status: ApplicationStatus,
    timestamps: &[&str],
) -> Result<Vec<job::Model>> {
    let repo = JobRepository::new(Arc::clone(db));
    let mut jobs = Vec::with_capacity(timestamps.len());
    for (index, timestamp) in timestamps.iter().enumerate() {
        jobs.push(
            repo.create(NewJob {
                user_id,
                company: format!("Company {index}"),
                title: "Engineer".to_string(),
                status,
                holiday_applied: None,
                created_at: at(timestamp),
            })
            .await?,
        );
    }
    Ok(jobs)
}

/// Inserts one scheduled interview per accepted timestamp.
pub async fn insert_interviews(
    db: &Arc<DatabaseConnection>,
    user_id: Uuid,
    accepted: &[&str],
) -> Result<()> {
    let repo = InterviewRepository::new(Arc::clone(db));
    for timestamp in accepted {
        let accepted_date = at(timestamp);
        repo.create(user_id, None, accepted_date, Some(accepted_date))
            .await?;
    }
    Ok(())
}

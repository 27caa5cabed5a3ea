//! Database migrations for the job tracker.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2025_11_10_090000_create_users;
mod m2025_11_10_090100_create_jobs;
mod m2025_11_10_090200_create_interviews;
mod m2025_11_10_090300_create_achievements;
mod m2025_11_10_090400_create_user_achievements;
mod m2025_11_10_090500_create_sessions;
mod m2025_11_10_090600_create_offers;
mod m2025_11_10_090700_create_rejections;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_11_10_090000_create_users::Migration),
            Box::new(m2025_11_10_090100_create_jobs::Migration),
            Box::new(m2025_11_10_090200_create_interviews::Migration),
            Box::new(m2025_11_10_090300_create_achievements::Migration),
            Box::new(m2025_11_10_090400_create_user_achievements::Migration),
            Box::new(m2025_11_10_090500_create_sessions::Migration),
            Box::new(m2025_11_10_090600_create_offers::Migration),
            Box::new(m2025_11_10_090700_create_rejections::Migration),
        ]
    }
}

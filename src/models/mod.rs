//! # Data Models
//!
//! This module contains all the data models used throughout the job tracker.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod achievement;
pub mod interview;
pub mod job;
pub mod offer;
pub mod rejection;
pub mod session;
pub mod user;
pub mod user_achievement;

pub use achievement::{AchievementCategory, Entity as Achievement};
pub use interview::Entity as Interview;
pub use job::{ApplicationStatus, Entity as Job};
pub use offer::Entity as Offer;
pub use rejection::{Entity as Rejection, RejectionInitiator};
pub use session::Entity as Session;
pub use user::{CandidateGoal, Entity as User};
pub use user_achievement::Entity as UserAchievement;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "job-tracker".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

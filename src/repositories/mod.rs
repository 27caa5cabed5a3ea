//! # Repository Layer
//!
//! Repository implementations that encapsulate SeaORM operations for each
//! entity, scoped by the owning user where applicable.

pub mod achievement;
pub mod interview;
pub mod job;
pub mod offer;
pub mod rejection;
pub mod session;
pub mod user;

pub use achievement::{AchievementRepository, AwardedAchievement};
pub use interview::InterviewRepository;
pub use job::{JobRepository, NewJob};
pub use offer::{OfferFields, OfferRepository};
pub use rejection::{RejectionFields, RejectionRepository};
pub use session::SessionRepository;
pub use user::UserRepository;

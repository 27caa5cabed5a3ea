//! # Job Tracker Library
//!
//! Core functionality for the job tracker service: the achievement and
//! weekly-streak pipeline, its HTTP handlers, persistence and server setup.

pub mod achievements;
pub mod auth;
pub mod cache;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod goals;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod server;
pub mod telemetry;
pub use migration;

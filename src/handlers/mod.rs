//! # API Handlers
//!
//! This module contains all the HTTP endpoint handlers for the job tracker.

pub mod achievements;
pub mod goals;
pub mod interviews;
pub mod jobs;
pub mod offers;
pub mod rejections;
pub mod trackers;

use axum::{extract::State, response::Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::db;
use crate::error::{ApiError, ErrorType};
use crate::models::ServiceInfo;
use crate::server::AppState;

/// Root handler that returns basic service information
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service information", body = ServiceInfo)
    ),
    tag = "root"
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo::default())
}

/// Liveness and database reachability
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    #[schema(example = "ok")]
    pub status: &'static str,
}

/// Health check that verifies the database answers a trivial query
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Service and database are healthy", body = HealthStatus),
        (status = 503, description = "Database unreachable", body = ApiError)
    ),
    tag = "root"
)]
pub async fn healthz(State(state): State<AppState>) -> Result<Json<HealthStatus>, ApiError> {
    db::health_check(&state.db).await.map_err(|error| {
        tracing::warn!(error = %error, "Health check failed");
        ApiError::from(ErrorType::ServiceUnavailable)
    })?;

    Ok(Json(HealthStatus { status: "ok" }))
}

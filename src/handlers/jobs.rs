//! # Job Application Handlers
//!
//! Logging new applications and moving them between board columns. Both
//! mutations drop the caller's cached applied-jobs reads.

use std::sync::Arc;

use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::cache::user_jobs_tag;
use crate::error::{ApiError, validation_error};
use crate::models::{ApplicationStatus, job};
use crate::repositories::{JobRepository, NewJob};
use crate::server::AppState;

const MAX_FIELD_LEN: usize = 255;

/// Payload for logging a job
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    #[schema(example = "Acme Corp")]
    pub company: String,
    #[schema(example = "Backend Engineer")]
    pub title: String,
    /// Defaults to `APPLIED`
    pub status: Option<ApplicationStatus>,
}

/// Payload for moving a job to another column
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateJobStatusRequest {
    pub status: ApplicationStatus,
}

/// A tracked job
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    #[schema(value_type = String)]
    pub id: Uuid,
    pub company: String,
    pub title: String,
    pub status: ApplicationStatus,
    /// Holiday the job was logged on, if any
    pub holiday_applied: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<FixedOffset>,
}

impl From<job::Model> for JobResponse {
    fn from(model: job::Model) -> Self {
        Self {
            id: model.id,
            company: model.company,
            title: model.title,
            status: model.status,
            holiday_applied: model.holiday_applied,
            created_at: model.created_at,
        }
    }
}

/// The job an offer or rejection belongs to
#[derive(Debug, Serialize, ToSchema)]
pub struct JobSummary {
    #[schema(value_type = String)]
    pub id: Uuid,
    pub company: String,
    pub title: String,
    pub status: ApplicationStatus,
}

impl From<job::Model> for JobSummary {
    fn from(model: job::Model) -> Self {
        Self {
            id: model.id,
            company: model.company,
            title: model.title,
            status: model.status,
        }
    }
}

/// 404 unless `job_id` belongs to `user`.
pub(crate) async fn owned_job(
    state: &AppState,
    user: CurrentUser,
    job_id: Uuid,
) -> Result<job::Model, ApiError> {
    JobRepository::new(Arc::clone(&state.db))
        .find_for_user(user.id, job_id)
        .await?
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Job not found"))
}

fn required_text(field: &str, value: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(validation_error(
            &format!("{field} is required and cannot be empty"),
            serde_json::json!({ "field": field }),
        ));
    }
    if trimmed.len() > MAX_FIELD_LEN {
        return Err(validation_error(
            &format!("{field} exceeds maximum length"),
            serde_json::json!({ "field": field, "max_length": MAX_FIELD_LEN }),
        ));
    }
    Ok(trimmed.to_string())
}

/// Logs a job application for the caller
#[utoipa::path(
    post,
    path = "/api/jobs",
    security(("bearer_auth" = [])),
    request_body = CreateJobRequest,
    responses(
        (status = 201, description = "Job created", body = JobResponse),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 401, description = "Missing or expired session", body = ApiError)
    ),
    tag = "jobs"
)]
pub async fn create_job(
    State(state): State<AppState>,
    user: CurrentUser,
    payload: Result<Json<CreateJobRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<JobResponse>), ApiError> {
    let Json(request) = payload?;
    let company = required_text("company", &request.company)?;
    let title = required_text("title", &request.title)?;

    let now = state.clock.now();
    let holiday_applied = state
        .calendars
        .holiday_on(now.date_naive())
        .map(str::to_string);

    let job = JobRepository::new(Arc::clone(&state.db))
        .create(NewJob {
            user_id: user.id,
            company,
            title,
            status: request.status.unwrap_or_default(),
            holiday_applied,
            created_at: now,
        })
        .await?;

    state.caches.invalidate_tag(&user_jobs_tag(user.id)).await;
    tracing::info!(
        job_id = %job.id,
        status = ?job.status,
        holiday = job.holiday_applied.as_deref().unwrap_or(""),
        "Job logged"
    );

    Ok((StatusCode::CREATED, Json(job.into())))
}

/// Moves one of the caller's jobs to a new status
#[utoipa::path(
    patch,
    path = "/api/jobs/{id}/status",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Job UUID")
    ),
    request_body = UpdateJobStatusRequest,
    responses(
        (status = 200, description = "Job updated", body = JobResponse),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 401, description = "Missing or expired session", body = ApiError),
        (status = 404, description = "Job not found", body = ApiError)
    ),
    tag = "jobs"
)]
pub async fn update_job_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(job_id): Path<Uuid>,
    payload: Result<Json<UpdateJobStatusRequest>, JsonRejection>,
) -> Result<Json<JobResponse>, ApiError> {
    let Json(request) = payload?;

    let job = JobRepository::new(Arc::clone(&state.db))
        .update_status(user.id, job_id, request.status)
        .await?
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Job not found"))?;

    state.caches.invalidate_tag(&user_jobs_tag(user.id)).await;
    tracing::info!(job_id = %job.id, status = ?job.status, "Job status updated");

    Ok(Json(job.into()))
}

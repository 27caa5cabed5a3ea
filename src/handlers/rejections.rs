//! # Rejection Handlers
//!
//! Recording and editing rejections, one per job, scoped to the caller.

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

use super::jobs::{JobSummary, owned_job};
use super::offers::{DeletedResponse, parse_date_field};
use crate::auth::CurrentUser;
use crate::error::{ApiError, validation_error};
use crate::models::{RejectionInitiator, job, rejection};
use crate::repositories::{JobRepository, RejectionFields, RejectionRepository};
use crate::server::AppState;

const REQUIRED_FIELDS: &str = "Rejection date, and initiated by are required fields.";

/// Payload for recording a rejection
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRejectionRequest {
    #[schema(value_type = String)]
    pub job_id: Uuid,
    #[serde(flatten)]
    pub rejection: RejectionRequest,
}

/// Rejection fields; `date` is RFC 3339 or `YYYY-MM-DD`
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectionRequest {
    #[schema(example = "2025-07-01")]
    pub date: Option<String>,
    pub initiated_by: Option<RejectionInitiator>,
    /// Replaces stored notes when present
    pub notes: Option<String>,
}

/// A recorded rejection
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectionResponse {
    #[schema(value_type = String)]
    pub id: Uuid,
    #[schema(value_type = String)]
    pub job_id: Uuid,
    #[schema(value_type = String, format = DateTime)]
    pub date: DateTime<FixedOffset>,
    pub initiated_by: RejectionInitiator,
    pub notes: Option<String>,
    pub job: Option<JobSummary>,
}

impl RejectionResponse {
    fn new(model: rejection::Model, job: Option<job::Model>) -> Self {
        Self {
            id: model.id,
            job_id: model.job_id,
            date: model.date,
            initiated_by: model.initiated_by,
            notes: model.notes,
            job: job.map(JobSummary::from),
        }
    }
}

fn rejection_fields(request: RejectionRequest) -> Result<RejectionFields, ApiError> {
    let date = request
        .date
        .as_deref()
        .map(str::trim)
        .filter(|date| !date.is_empty());
    let (Some(date), Some(initiated_by)) = (date, request.initiated_by) else {
        return Err(validation_error(
            REQUIRED_FIELDS,
            serde_json::json!({ "fields": ["date", "initiatedBy"] }),
        ));
    };

    Ok(RejectionFields {
        date: parse_date_field("date", date)?,
        initiated_by,
        notes: request.notes,
    })
}

fn rejection_not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Rejection not found")
}

/// Lists the caller's rejections
#[utoipa::path(
    get,
    path = "/api/rejections",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Rejections with their jobs", body = Vec<RejectionResponse>),
        (status = 401, description = "Missing or expired session", body = ApiError)
    ),
    tag = "rejections"
)]
pub async fn list_rejections(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<RejectionResponse>>, ApiError> {
    let rejections = RejectionRepository::new(Arc::clone(&state.db))
        .list_for_user(user.id)
        .await?;

    Ok(Json(
        rejections
            .into_iter()
            .map(|(rejection, job)| RejectionResponse::new(rejection, job))
            .collect(),
    ))
}

/// Records a rejection for one of the caller's jobs
#[utoipa::path(
    post,
    path = "/api/rejections",
    security(("bearer_auth" = [])),
    request_body = CreateRejectionRequest,
    responses(
        (status = 201, description = "Rejection recorded", body = RejectionResponse),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 401, description = "Missing or expired session", body = ApiError),
        (status = 404, description = "Job not found", body = ApiError),
        (status = 409, description = "The job already has a rejection", body = ApiError)
    ),
    tag = "rejections"
)]
pub async fn create_rejection(
    State(state): State<AppState>,
    user: CurrentUser,
    payload: Result<Json<CreateRejectionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RejectionResponse>), ApiError> {
    let Json(request) = payload?;
    let fields = rejection_fields(request.rejection)?;
    let job = owned_job(&state, user, request.job_id).await?;

    let rejection = RejectionRepository::new(Arc::clone(&state.db))
        .create(user.id, job.id, fields)
        .await?;
    tracing::info!(
        rejection_id = %rejection.id,
        job_id = %job.id,
        initiated_by = ?rejection.initiated_by,
        "Rejection recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(RejectionResponse::new(rejection, Some(job))),
    ))
}

/// Fetches one of the caller's rejections
#[utoipa::path(
    get,
    path = "/api/rejections/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Rejection UUID")),
    responses(
        (status = 200, description = "The rejection", body = RejectionResponse),
        (status = 401, description = "Missing or expired session", body = ApiError),
        (status = 404, description = "Rejection not found", body = ApiError)
    ),
    tag = "rejections"
)]
pub async fn get_rejection(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(rejection_id): Path<Uuid>,
) -> Result<Json<RejectionResponse>, ApiError> {
    let (rejection, job) = RejectionRepository::new(Arc::clone(&state.db))
        .find_for_user(user.id, rejection_id)
        .await?
        .ok_or_else(rejection_not_found)?;

    Ok(Json(RejectionResponse::new(rejection, job)))
}

/// Updates one of the caller's rejections
#[utoipa::path(
    put,
    path = "/api/rejections/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Rejection UUID")),
    request_body = RejectionRequest,
    responses(
        (status = 200, description = "Rejection updated", body = RejectionResponse),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 401, description = "Missing or expired session", body = ApiError),
        (status = 404, description = "Rejection not found", body = ApiError)
    ),
    tag = "rejections"
)]
pub async fn update_rejection(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(rejection_id): Path<Uuid>,
    payload: Result<Json<RejectionRequest>, JsonRejection>,
) -> Result<Json<RejectionResponse>, ApiError> {
    let Json(request) = payload?;
    let fields = rejection_fields(request)?;

    let rejection = RejectionRepository::new(Arc::clone(&state.db))
        .update(user.id, rejection_id, fields)
        .await?
        .ok_or_else(rejection_not_found)?;
    let job = JobRepository::new(Arc::clone(&state.db))
        .find_for_user(user.id, rejection.job_id)
        .await?;
    tracing::info!(rejection_id = %rejection.id, "Rejection updated");

    Ok(Json(RejectionResponse::new(rejection, job)))
}

/// Deletes one of the caller's rejections
#[utoipa::path(
    delete,
    path = "/api/rejections/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Rejection UUID")),
    responses(
        (status = 200, description = "Rejection deleted", body = DeletedResponse),
        (status = 401, description = "Missing or expired session", body = ApiError),
        (status = 404, description = "Rejection not found", body = ApiError)
    ),
    tag = "rejections"
)]
pub async fn delete_rejection(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(rejection_id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, ApiError> {
    if !RejectionRepository::new(Arc::clone(&state.db))
        .delete(user.id, rejection_id)
        .await?
    {
        return Err(rejection_not_found());
    }
    tracing::info!(%rejection_id, "Rejection deleted");

    Ok(Json(DeletedResponse {
        message: "Rejection deleted successfully",
    }))
}

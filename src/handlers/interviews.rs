//! Interview logging.

use std::sync::Arc;

use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::cache::user_interviews_tag;
use crate::error::{ApiError, validation_error};
use crate::models::interview;
use crate::repositories::InterviewRepository;
use crate::server::AppState;

/// Payload for logging an interview
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInterviewRequest {
    #[schema(value_type = Option<String>)]
    pub job_id: Option<Uuid>,
    /// When the invitation was accepted; defaults to now
    #[schema(value_type = Option<String>, format = DateTime)]
    pub accepted_date: Option<DateTime<FixedOffset>>,
    /// When the interview takes place, if scheduled
    #[schema(value_type = Option<String>, format = DateTime)]
    pub interview_date: Option<DateTime<FixedOffset>>,
}

/// A logged interview
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterviewResponse {
    #[schema(value_type = String)]
    pub id: Uuid,
    #[schema(value_type = Option<String>)]
    pub job_id: Option<Uuid>,
    #[schema(value_type = String, format = DateTime)]
    pub accepted_date: DateTime<FixedOffset>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub interview_date: Option<DateTime<FixedOffset>>,
}

impl From<interview::Model> for InterviewResponse {
    fn from(model: interview::Model) -> Self {
        Self {
            id: model.id,
            job_id: model.job_id,
            accepted_date: model.accepted_date,
            interview_date: model.interview_date,
        }
    }
}

/// Logs an interview for the caller
#[utoipa::path(
    post,
    path = "/api/interviews",
    security(("bearer_auth" = [])),
    request_body = CreateInterviewRequest,
    responses(
        (status = 201, description = "Interview created", body = InterviewResponse),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 401, description = "Missing or expired session", body = ApiError)
    ),
    tag = "interviews"
)]
pub async fn create_interview(
    State(state): State<AppState>,
    user: CurrentUser,
    payload: Result<Json<CreateInterviewRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<InterviewResponse>), ApiError> {
    let Json(request) = payload?;
    let accepted_date = request.accepted_date.unwrap_or_else(|| state.clock.now());

    if let Some(interview_date) = request.interview_date
        && interview_date < accepted_date
    {
        return Err(validation_error(
            "interviewDate cannot be before acceptedDate",
            serde_json::json!({ "field": "interviewDate" }),
        ));
    }

    let interview = InterviewRepository::new(Arc::clone(&state.db))
        .create(user.id, request.job_id, accepted_date, request.interview_date)
        .await?;

    state
        .caches
        .invalidate_tag(&user_interviews_tag(user.id))
        .await;
    tracing::info!(
        interview_id = %interview.id,
        scheduled = interview.interview_date.is_some(),
        "Interview logged"
    );

    Ok((StatusCode::CREATED, Json(interview.into())))
}

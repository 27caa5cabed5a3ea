//! Goal settings endpoints.

use std::sync::Arc;

use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::goals::{GoalSettings, GoalSettingsRequest, validate_goal_settings};
use crate::models::user;
use crate::repositories::UserRepository;
use crate::server::AppState;

pub(crate) async fn load_user(
    state: &AppState,
    user: CurrentUser,
) -> Result<user::Model, ApiError> {
    UserRepository::new(Arc::clone(&state.db))
        .find_by_id(user.id)
        .await?
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "User not found"))
}

/// Returns the caller's goal settings
#[utoipa::path(
    get,
    path = "/api/weekly-application-goal",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current goal settings", body = GoalSettings),
        (status = 401, description = "Missing or expired session", body = ApiError),
        (status = 404, description = "User not found", body = ApiError)
    ),
    tag = "goals"
)]
pub async fn get_goals(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<GoalSettings>, ApiError> {
    let user = load_user(&state, user).await?;
    Ok(Json(GoalSettings::from(&user)))
}

/// Updates the caller's goal settings
#[utoipa::path(
    put,
    path = "/api/weekly-application-goal",
    security(("bearer_auth" = [])),
    request_body = GoalSettingsRequest,
    responses(
        (status = 200, description = "Goal settings updated", body = GoalSettings),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 401, description = "Missing or expired session", body = ApiError),
        (status = 404, description = "User not found", body = ApiError)
    ),
    tag = "goals"
)]
pub async fn update_goals(
    State(state): State<AppState>,
    user: CurrentUser,
    payload: Result<Json<GoalSettingsRequest>, JsonRejection>,
) -> Result<Json<GoalSettings>, ApiError> {
    let Json(request) = payload?;
    let update = validate_goal_settings(&request)?;

    let existing = load_user(&state, user).await?;
    let updated = UserRepository::new(Arc::clone(&state.db))
        .update_goals(existing, &update)
        .await?;

    tracing::info!(
        user_id = %updated.id,
        days_per_week = ?updated.jobs_applied_to_days_per_week_goal,
        monthly_interviews = ?updated.monthly_interview_goal,
        "Goal settings updated"
    );

    Ok(Json(GoalSettings::from(&updated)))
}

//! Achievement endpoints.
//!
//! Two thin adapters over [`AchievementService`](crate::achievements::AchievementService):
//! the REST route answers 401 to anonymous callers and fails the whole request
//! when an award cannot be stored; the page route redirects anonymous callers
//! to the login page and tolerates individual award failures.

use axum::{
    extract::State,
    response::{IntoResponse, Json, Redirect, Response},
};

use crate::achievements::{AchievementsReport, PersistenceMode};
use crate::auth::{CurrentUser, MaybeUser};
use crate::error::ApiError;
use crate::server::AppState;

/// Computes, persists and returns the caller's achievements
#[utoipa::path(
    get,
    path = "/api/achievements",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Achievements grouped by category", body = AchievementsReport),
        (status = 401, description = "Missing or expired session", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "achievements"
)]
pub async fn get_achievements(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<AchievementsReport>, ApiError> {
    let report = state
        .achievements
        .achievements_for(user.id, PersistenceMode::FailFast)
        .await?;
    Ok(Json(report))
}

/// Server-rendered achievements page data
#[utoipa::path(
    get,
    path = "/achievements",
    responses(
        (status = 200, description = "Achievements grouped by category", body = AchievementsReport),
        (status = 303, description = "Not signed in; redirected to the login page"),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "achievements"
)]
pub async fn achievements_page(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> Result<Response, ApiError> {
    let Some(user) = user else {
        return Ok(Redirect::to(&state.config.login_path).into_response());
    };

    let report = state
        .achievements
        .achievements_for(user.id, PersistenceMode::BestEffort)
        .await?;
    Ok(Json(report).into_response())
}

//! # Offer Handlers
//!
//! Recording, listing and editing job offers. A job carries at most one
//! offer; all routes are scoped to the caller.

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
use crate::auth::CurrentUser;
use crate::error::{ApiError, validation_error};
use crate::goals::parse_goal_date;
use crate::models::{job, offer};
use crate::repositories::{JobRepository, OfferFields, OfferRepository};
use crate::server::AppState;

const REQUIRED_FIELDS: &str = "Offer date, offer deadline, and salary are required fields.";

/// Payload for recording an offer
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOfferRequest {
    #[schema(value_type = String)]
    pub job_id: Uuid,
    #[serde(flatten)]
    pub offer: OfferRequest,
}

/// Offer fields; dates are RFC 3339 or `YYYY-MM-DD`
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfferRequest {
    #[schema(example = "2025-07-01")]
    pub offer_date: Option<String>,
    #[schema(example = "2025-07-15")]
    pub offer_deadline: Option<String>,
    #[schema(example = "$120,000")]
    pub salary: Option<String>,
}

/// A recorded offer
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfferResponse {
    #[schema(value_type = String)]
    pub id: Uuid,
    #[schema(value_type = String)]
    pub job_id: Uuid,
    #[schema(value_type = String, format = DateTime)]
    pub offer_date: DateTime<FixedOffset>,
    #[schema(value_type = String, format = DateTime)]
    pub offer_deadline: DateTime<FixedOffset>,
    pub salary: String,
    pub job: Option<JobSummary>,
}

impl OfferResponse {
    fn new(model: offer::Model, job: Option<job::Model>) -> Self {
        Self {
            id: model.id,
            job_id: model.job_id,
            offer_date: model.offer_date,
            offer_deadline: model.offer_deadline,
            salary: model.salary,
            job: job.map(JobSummary::from),
        }
    }
}

/// Confirmation body for deletions
#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedResponse {
    pub message: &'static str,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

pub(crate) fn parse_date_field(field: &str, raw: &str) -> Result<DateTime<FixedOffset>, ApiError> {
    parse_goal_date(raw).ok_or_else(|| {
        validation_error(
            &format!("{field} must be an RFC 3339 timestamp or a YYYY-MM-DD date"),
            serde_json::json!({ "field": field }),
        )
    })
}

fn offer_fields(request: &OfferRequest) -> Result<OfferFields, ApiError> {
    let (Some(offer_date), Some(offer_deadline), Some(salary)) = (
        present(request.offer_date.as_deref()),
        present(request.offer_deadline.as_deref()),
        present(request.salary.as_deref()),
    ) else {
        return Err(validation_error(
            REQUIRED_FIELDS,
            serde_json::json!({ "fields": ["offerDate", "offerDeadline", "salary"] }),
        ));
    };

    Ok(OfferFields {
        offer_date: parse_date_field("offerDate", offer_date)?,
        offer_deadline: parse_date_field("offerDeadline", offer_deadline)?,
        salary: salary.to_string(),
    })
}

fn offer_not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Offer not found")
}

/// Lists the caller's offers
#[utoipa::path(
    get,
    path = "/api/offers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Offers with their jobs", body = Vec<OfferResponse>),
        (status = 401, description = "Missing or expired session", body = ApiError)
    ),
    tag = "offers"
)]
pub async fn list_offers(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<OfferResponse>>, ApiError> {
    let offers = OfferRepository::new(Arc::clone(&state.db))
        .list_for_user(user.id)
        .await?;

    Ok(Json(
        offers
            .into_iter()
            .map(|(offer, job)| OfferResponse::new(offer, job))
            .collect(),
    ))
}

/// Records an offer for one of the caller's jobs
#[utoipa::path(
    post,
    path = "/api/offers",
    security(("bearer_auth" = [])),
    request_body = CreateOfferRequest,
    responses(
        (status = 201, description = "Offer recorded", body = OfferResponse),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 401, description = "Missing or expired session", body = ApiError),
        (status = 404, description = "Job not found", body = ApiError),
        (status = 409, description = "The job already has an offer", body = ApiError)
    ),
    tag = "offers"
)]
pub async fn create_offer(
    State(state): State<AppState>,
    user: CurrentUser,
    payload: Result<Json<CreateOfferRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OfferResponse>), ApiError> {
    let Json(request) = payload?;
    let fields = offer_fields(&request.offer)?;
    let job = owned_job(&state, user, request.job_id).await?;

    let offer = OfferRepository::new(Arc::clone(&state.db))
        .create(user.id, job.id, fields)
        .await?;
    tracing::info!(offer_id = %offer.id, job_id = %job.id, "Offer recorded");

    Ok((StatusCode::CREATED, Json(OfferResponse::new(offer, Some(job)))))
}

/// Fetches one of the caller's offers
#[utoipa::path(
    get,
    path = "/api/offers/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Offer UUID")),
    responses(
        (status = 200, description = "The offer", body = OfferResponse),
        (status = 401, description = "Missing or expired session", body = ApiError),
        (status = 404, description = "Offer not found", body = ApiError)
    ),
    tag = "offers"
)]
pub async fn get_offer(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(offer_id): Path<Uuid>,
) -> Result<Json<OfferResponse>, ApiError> {
    let (offer, job) = OfferRepository::new(Arc::clone(&state.db))
        .find_for_user(user.id, offer_id)
        .await?
        .ok_or_else(offer_not_found)?;

    Ok(Json(OfferResponse::new(offer, job)))
}

/// Replaces the fields of one of the caller's offers
#[utoipa::path(
    put,
    path = "/api/offers/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Offer UUID")),
    request_body = OfferRequest,
    responses(
        (status = 200, description = "Offer updated", body = OfferResponse),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 401, description = "Missing or expired session", body = ApiError),
        (status = 404, description = "Offer not found", body = ApiError)
    ),
    tag = "offers"
)]
pub async fn update_offer(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(offer_id): Path<Uuid>,
    payload: Result<Json<OfferRequest>, JsonRejection>,
) -> Result<Json<OfferResponse>, ApiError> {
    let Json(request) = payload?;
    let fields = offer_fields(&request)?;

    let offer = OfferRepository::new(Arc::clone(&state.db))
        .update(user.id, offer_id, fields)
        .await?
        .ok_or_else(offer_not_found)?;
    let job = JobRepository::new(Arc::clone(&state.db))
        .find_for_user(user.id, offer.job_id)
        .await?;
    tracing::info!(offer_id = %offer.id, "Offer updated");

    Ok(Json(OfferResponse::new(offer, job)))
}

/// Deletes one of the caller's offers
#[utoipa::path(
    delete,
    path = "/api/offers/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Offer UUID")),
    responses(
        (status = 200, description = "Offer deleted", body = DeletedResponse),
        (status = 401, description = "Missing or expired session", body = ApiError),
        (status = 404, description = "Offer not found", body = ApiError)
    ),
    tag = "offers"
)]
pub async fn delete_offer(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(offer_id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = OfferRepository::new(Arc::clone(&state.db))
        .delete(user.id, offer_id)
        .await?;
    if !deleted {
        return Err(offer_not_found());
    }
    tracing::info!(%offer_id, "Offer deleted");

    Ok(Json(DeletedResponse {
        message: "Offer deleted successfully",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(date: Option<&str>, deadline: Option<&str>, salary: Option<&str>) -> OfferRequest {
        OfferRequest {
            offer_date: date.map(str::to_string),
            offer_deadline: deadline.map(str::to_string),
            salary: salary.map(str::to_string),
        }
    }

    #[test]
    fn every_field_is_required() {
        for incomplete in [
            request(None, Some("2025-07-15"), Some("$100k")),
            request(Some("2025-07-01"), None, Some("$100k")),
            request(Some("2025-07-01"), Some("2025-07-15"), Some("   ")),
        ] {
            let error = offer_fields(&incomplete).unwrap_err();
            assert_eq!(error.status, StatusCode::BAD_REQUEST);
            assert_eq!(error.message, Box::from(REQUIRED_FIELDS));
        }
    }

    #[test]
    fn dates_accept_plain_days_and_timestamps() {
        let fields = offer_fields(&request(
            Some("2025-07-01"),
            Some("2025-07-15T17:00:00-07:00"),
            Some(" $120,000 "),
        ))
        .unwrap();

        assert_eq!(fields.offer_date.to_rfc3339(), "2025-07-01T00:00:00+00:00");
        assert_eq!(fields.offer_deadline.to_rfc3339(), "2025-07-16T00:00:00+00:00");
        assert_eq!(fields.salary, "$120,000");
    }

    #[test]
    fn unparseable_dates_name_the_field() {
        let error = offer_fields(&request(Some("next week"), Some("2025-07-15"), Some("$1")))
            .unwrap_err();

        assert_eq!(error.details, Some(Box::new(serde_json::json!({ "field": "offerDate" }))));
    }
}

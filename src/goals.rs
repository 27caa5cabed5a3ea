//! Goal settings validation.
//!
//! Turns a raw `PUT /api/weekly-application-goal` payload into a [`GoalUpdate`]
//! the user repository can apply, or the first rule it breaks.

use axum::http::StatusCode;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use sea_orm::{ActiveEnum, Iterable};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::{CandidateGoal, user};

/// Goal fields as submitted by the client. Numbers are kept loose so that
/// non-integers can be reported with a dedicated message.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoalSettingsRequest {
    #[schema(value_type = Option<i64>)]
    pub jobs_applied_to_days_per_week_goal: Option<serde_json::Number>,
    #[schema(value_type = Option<i64>)]
    pub jobs_applied_to_weekly_goal_min: Option<serde_json::Number>,
    #[schema(value_type = Option<i64>)]
    pub jobs_applied_to_weekly_goal_max: Option<serde_json::Number>,
    #[schema(value_type = Option<i64>)]
    pub monthly_interview_goal: Option<serde_json::Number>,
    pub candidate_goal: Option<String>,
    pub offer_received_by_date_goal: Option<String>,
    pub offer_received_by_date_goal_start: Option<String>,
    pub offer_received_by_date_goal_end: Option<String>,
}

/// The user's current goal settings.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoalSettings {
    pub jobs_applied_to_days_per_week_goal: Option<i32>,
    pub jobs_applied_to_weekly_goal_min: Option<i32>,
    pub jobs_applied_to_weekly_goal_max: Option<i32>,
    pub monthly_interview_goal: Option<i32>,
    pub candidate_goal: Option<CandidateGoal>,
    pub offer_received_by_date_goal: Option<DateTime<FixedOffset>>,
    pub offer_received_by_date_goal_start: Option<DateTime<FixedOffset>>,
    pub offer_received_by_date_goal_end: Option<DateTime<FixedOffset>>,
}

impl From<&user::Model> for GoalSettings {
    fn from(user: &user::Model) -> Self {
        Self {
            jobs_applied_to_days_per_week_goal: user.jobs_applied_to_days_per_week_goal,
            jobs_applied_to_weekly_goal_min: user.jobs_applied_to_weekly_goal_min,
            jobs_applied_to_weekly_goal_max: user.jobs_applied_to_weekly_goal_max,
            monthly_interview_goal: user.monthly_interview_goal,
            candidate_goal: user.candidate_goal,
            offer_received_by_date_goal: user.offer_received_by_date_goal,
            offer_received_by_date_goal_start: user.offer_received_by_date_goal_start,
            offer_received_by_date_goal_end: user.offer_received_by_date_goal_end,
        }
    }
}

/// A validated change set. `None` leaves a field untouched, except for the
/// offer date range which is cleared whenever it is not supplied in full.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalUpdate {
    pub days_per_week: Option<i32>,
    pub weekly_range: Option<(i32, i32)>,
    pub monthly_interviews: Option<i32>,
    pub candidate_goal: Option<CandidateGoal>,
    pub offer_received_by: Option<DateTime<FixedOffset>>,
    pub offer_range: Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GoalValidationError {
    #[error("Invalid days per week goal target. It must be between 0 and 7 days.")]
    DaysPerWeek,
    #[error("Weekly goals must be integers.")]
    WeeklyNotIntegers,
    #[error("Weekly goal max must be greater than weekly goal min.")]
    WeeklyEqual,
    #[error("Weekly goal min must be less than weekly goal max.")]
    WeeklyInverted,
    #[error("Invalid monthly interviews scheduled goal. It must be a positive integer.")]
    MonthlyInterviews,
    #[error("Invalid career goal. Please select from valid options.")]
    CandidateGoal,
    #[error("Invalid offer received date goal format.")]
    OfferDate,
    #[error("Invalid date range format.")]
    OfferRangeFormat,
    #[error("Start date must be earlier than end date.")]
    OfferRangeOrder,
}

impl GoalValidationError {
    fn field(&self) -> &'static str {
        match self {
            Self::DaysPerWeek => "jobsAppliedToDaysPerWeekGoal",
            Self::WeeklyNotIntegers | Self::WeeklyEqual | Self::WeeklyInverted => {
                "jobsAppliedToWeeklyGoal"
            }
            Self::MonthlyInterviews => "monthlyInterviewGoal",
            Self::CandidateGoal => "candidateGoal",
            Self::OfferDate => "offerReceivedByDateGoal",
            Self::OfferRangeFormat | Self::OfferRangeOrder => "offerReceivedByDateGoalRange",
        }
    }
}

impl From<GoalValidationError> for ApiError {
    fn from(error: GoalValidationError) -> Self {
        let message = error.to_string();
        ApiError::new(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", message.as_str())
            .with_details(json!({ "field": error.field() }))
    }
}

/// Validates a goal payload, checking rules in a fixed order and reporting the
/// first violation.
pub fn validate_goal_settings(
    request: &GoalSettingsRequest,
) -> Result<GoalUpdate, GoalValidationError> {
    let mut update = GoalUpdate::default();

    if let Some(days) = &request.jobs_applied_to_days_per_week_goal {
        let days = as_i32(days)
            .filter(|d| (0..=7).contains(d))
            .ok_or(GoalValidationError::DaysPerWeek)?;
        update.days_per_week = Some(days);
    }

    if let (Some(min), Some(max)) = (
        &request.jobs_applied_to_weekly_goal_min,
        &request.jobs_applied_to_weekly_goal_max,
    ) {
        let (Some(min), Some(max)) = (as_i32(min), as_i32(max)) else {
            return Err(GoalValidationError::WeeklyNotIntegers);
        };
        if min == max {
            return Err(GoalValidationError::WeeklyEqual);
        }
        if min > max {
            return Err(GoalValidationError::WeeklyInverted);
        }
        update.weekly_range = Some((min, max));
    }

    if let Some(monthly) = &request.monthly_interview_goal {
        let monthly = as_i32(monthly)
            .filter(|m| *m >= 0)
            .ok_or(GoalValidationError::MonthlyInterviews)?;
        update.monthly_interviews = Some(monthly);
    }

    if let Some(goal) = &request.candidate_goal {
        let goal = CandidateGoal::iter()
            .find(|candidate| candidate.to_value() == *goal)
            .ok_or(GoalValidationError::CandidateGoal)?;
        update.candidate_goal = Some(goal);
    }

    if let Some(raw) = &request.offer_received_by_date_goal {
        update.offer_received_by = Some(parse_goal_date(raw).ok_or(GoalValidationError::OfferDate)?);
    }

    if let (Some(start), Some(end)) = (
        &request.offer_received_by_date_goal_start,
        &request.offer_received_by_date_goal_end,
    ) {
        let (Some(start), Some(end)) = (parse_goal_date(start), parse_goal_date(end)) else {
            return Err(GoalValidationError::OfferRangeFormat);
        };
        if start > end {
            return Err(GoalValidationError::OfferRangeOrder);
        }
        update.offer_range = Some((start, end));
    }

    Ok(update)
}

fn as_i32(number: &serde_json::Number) -> Option<i32> {
    if let Some(value) = number.as_i64() {
        return i32::try_from(value).ok();
    }
    // 3.0 is an integer, 3.5 is not.
    number
        .as_f64()
        .filter(|value| value.fract() == 0.0 && value.abs() <= f64::from(i32::MAX))
        .map(|value| value as i32)
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_goal_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc).fixed_offset());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

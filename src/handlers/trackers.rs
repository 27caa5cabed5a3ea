//! # Goal Tracker Handlers
//!
//! Progress widgets for the profile page: which days of the current week had
//! applications, how many, and how far the caller is from this month's
//! interview goal, plus the overall application-to-interview rate. Weeks run
//! Sunday to Saturday in local server time and only days up to today are
//! reported.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{DateTime, Datelike, FixedOffset, Months, NaiveDate, TimeDelta, Weekday};
use serde::Serialize;
use utoipa::ToSchema;

use crate::achievements::streak::{current_week, local_midnight};
use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::handlers::goals::load_user;
use crate::models::{ApplicationStatus, job};
use crate::repositories::{InterviewRepository, JobRepository};
use crate::server::AppState;

/// Statuses that count towards the weekly trackers.
const TRACKED_STATUSES: [ApplicationStatus; 2] =
    [ApplicationStatus::Applied, ApplicationStatus::Interview];

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

/// Applications logged on one weekday.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct DayPresence {
    pub presence: bool,
    pub count: usize,
}

/// Per-day application counts from Sunday through today.
fn week_presence(jobs: &[job::Model], now: DateTime<FixedOffset>) -> Vec<(&'static str, DayPresence)> {
    let offset = *now.offset();
    let mut days = [DayPresence::default(); 7];
    for job in jobs {
        let day = job.created_at.with_timezone(&offset).weekday();
        let slot = &mut days[day.num_days_from_sunday() as usize];
        slot.presence = true;
        slot.count += 1;
    }

    let today = now.weekday().num_days_from_sunday() as usize;
    WEEKDAYS
        .iter()
        .zip(days)
        .take(today + 1)
        .map(|(day, presence)| (day_name(*day), presence))
        .collect()
}

/// First and last instant of the local month containing `now`.
fn current_month(now: DateTime<FixedOffset>) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
    let offset = *now.offset();
    let first = NaiveDate::from_ymd_opt(now.year(), now.month(), 1).unwrap_or(now.date_naive());
    let next = first.checked_add_months(Months::new(1)).unwrap_or(first);
    (
        local_midnight(first, offset),
        local_midnight(next, offset) - TimeDelta::milliseconds(1),
    )
}

fn remaining_interviews_message(goal: i32, scheduled: u64) -> String {
    let scheduled = i64::try_from(scheduled).unwrap_or(i64::MAX);
    let remaining = (i64::from(goal) - scheduled).max(0);
    let plural = if remaining > 1 { "s" } else { "" };
    format!(
        "You need to schedule {remaining} more interview{plural} this month to meet your goal of {goal} interviews."
    )
}

async fn tracked_jobs_this_week(
    state: &AppState,
    user: CurrentUser,
    now: DateTime<FixedOffset>,
) -> Result<Vec<job::Model>, ApiError> {
    let week = current_week(now);
    Ok(JobRepository::new(Arc::clone(&state.db))
        .with_status_between(user.id, &TRACKED_STATUSES, week.start, week.end)
        .await?)
}

/// Which days of the current week had at least one application
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyDayTracker {
    /// `[dayName, applied]` pairs from Sunday through today
    #[schema(value_type = Vec<Vec<Object>>, example = json!([["Sunday", false], ["Monday", true]]))]
    pub application_presence: Vec<(&'static str, bool)>,
    pub jobs_applied_to_days_per_week_goal: Option<i32>,
}

/// Days of the current week with applications, against the days-per-week goal
#[utoipa::path(
    get,
    path = "/api/weekly-application-day-tracker",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Application presence per day", body = WeeklyDayTracker),
        (status = 401, description = "Missing or expired session", body = ApiError)
    ),
    tag = "goals"
)]
pub async fn weekly_application_day_tracker(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<WeeklyDayTracker>, ApiError> {
    let now = state.clock.now();
    let profile = load_user(&state, user).await?;
    let jobs = tracked_jobs_this_week(&state, user, now).await?;

    Ok(Json(WeeklyDayTracker {
        application_presence: week_presence(&jobs, now)
            .into_iter()
            .map(|(day, presence)| (day, presence.presence))
            .collect(),
        jobs_applied_to_days_per_week_goal: profile.jobs_applied_to_days_per_week_goal,
    }))
}

/// Applications per day of the current week
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyGoalTracker {
    /// `[dayName, {presence, count}]` pairs from Sunday through today
    #[schema(value_type = Vec<Vec<Object>>, example = json!([["Sunday", {"presence": true, "count": 2}]]))]
    pub application_presence: Vec<(&'static str, DayPresence)>,
    pub total_applications: usize,
    pub jobs_applied_to_days_per_week_goal: Option<i32>,
    pub jobs_applied_to_weekly_goal_min: Option<i32>,
    pub jobs_applied_to_weekly_goal_max: Option<i32>,
}

/// Application counts for the current week, against the weekly goals
#[utoipa::path(
    get,
    path = "/api/weekly-application-goal-tracker",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Application counts per day", body = WeeklyGoalTracker),
        (status = 401, description = "Missing or expired session", body = ApiError)
    ),
    tag = "goals"
)]
pub async fn weekly_application_goal_tracker(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<WeeklyGoalTracker>, ApiError> {
    let now = state.clock.now();
    let profile = load_user(&state, user).await?;
    let jobs = tracked_jobs_this_week(&state, user, now).await?;

    Ok(Json(WeeklyGoalTracker {
        application_presence: week_presence(&jobs, now),
        total_applications: jobs.len(),
        jobs_applied_to_days_per_week_goal: profile.jobs_applied_to_days_per_week_goal,
        jobs_applied_to_weekly_goal_min: profile.jobs_applied_to_weekly_goal_min,
        jobs_applied_to_weekly_goal_max: profile.jobs_applied_to_weekly_goal_max,
    }))
}

/// Progress towards the monthly interview goal
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyInterviewTracker {
    pub message: String,
    pub current_month_interviews: u64,
    pub target_interviews_per_month: i32,
}

/// Interviews scheduled this month, against the monthly goal
#[utoipa::path(
    get,
    path = "/api/monthly-interview-goal-tracker",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Monthly interview progress", body = MonthlyInterviewTracker),
        (status = 400, description = "No monthly interview goal set", body = ApiError),
        (status = 401, description = "Missing or expired session", body = ApiError)
    ),
    tag = "goals"
)]
pub async fn monthly_interview_goal_tracker(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<MonthlyInterviewTracker>, ApiError> {
    let profile = load_user(&state, user).await?;
    let Some(goal) = profile.monthly_interview_goal else {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_FAILED",
            "No monthly interview goal set.",
        ));
    };

    let (start, end) = current_month(state.clock.now());
    let scheduled = InterviewRepository::new(Arc::clone(&state.db))
        .count_scheduled_between(user.id, start, end)
        .await?;

    Ok(Json(MonthlyInterviewTracker {
        message: remaining_interviews_message(goal, scheduled),
        current_month_interviews: scheduled,
        target_interviews_per_month: goal,
    }))
}

/// Percentage of `applications` that reached an interview, to 2 decimals.
fn interview_rate(applications: usize, interviewed: usize) -> f64 {
    if applications == 0 {
        return 0.0;
    }
    let as_f64 = |count: usize| u32::try_from(count).map_or(f64::from(u32::MAX), f64::from);
    (as_f64(interviewed) / as_f64(applications) * 10_000.0).round() / 100.0
}

/// Share of submitted applications that led to an interview
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterviewConversionRate {
    pub total_applications: usize,
    pub total_interviews: usize,
    /// Percentage, rounded to 2 decimals
    #[schema(example = 33.33)]
    pub interview_rate: f64,
    pub message: String,
}

impl InterviewConversionRate {
    fn new(total_applications: usize, total_interviews: usize) -> Self {
        let interview_rate = interview_rate(total_applications, total_interviews);
        Self {
            total_applications,
            total_interviews,
            interview_rate,
            message: format!(
                "You have logged {total_interviews} interviews out of {total_applications} applications. Your interview rate is {interview_rate}%."
            ),
        }
    }
}

/// How many submitted applications have an interview logged against them
#[utoipa::path(
    get,
    path = "/api/interview-conversion-rate",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Interview conversion rate", body = InterviewConversionRate),
        (status = 401, description = "Missing or expired session", body = ApiError)
    ),
    tag = "goals"
)]
pub async fn interview_conversion_rate(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<InterviewConversionRate>, ApiError> {
    let job_repo = JobRepository::new(Arc::clone(&state.db));
    let interview_repo = InterviewRepository::new(Arc::clone(&state.db));
    let (applied, interviewed) = tokio::try_join!(
        job_repo.applied_jobs(user.id),
        interview_repo.interviewed_job_ids(user.id),
    )?;

    let total_interviews = applied
        .iter()
        .filter(|job| interviewed.contains(&job.id))
        .count();
    tracing::debug!(
        applications = applied.len(),
        interviewed = total_interviews,
        "Computed interview conversion rate"
    );

    Ok(Json(InterviewConversionRate::new(applied.len(), total_interviews)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::test_support::{job_on, local};
    use uuid::Uuid;

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    #[test]
    fn presence_runs_from_sunday_through_today() {
        let user = Uuid::new_v4();
        // Wednesday 2025-06-11, local UTC-8.
        let now = at("2025-06-11T12:00:00-08:00");
        let jobs = vec![
            job_on(user, "2025-06-09T09:00:00-08:00"),
            job_on(user, "2025-06-09T17:00:00-08:00"),
            // 02:00 UTC Wednesday is still Tuesday evening locally.
            job_on(user, "2025-06-11T02:00:00Z"),
        ];

        let presence = week_presence(&jobs, now);

        let names: Vec<_> = presence.iter().map(|(day, _)| *day).collect();
        assert_eq!(names, ["Sunday", "Monday", "Tuesday", "Wednesday"]);
        assert_eq!(presence[0].1, DayPresence::default());
        assert_eq!(presence[1].1, DayPresence { presence: true, count: 2 });
        assert_eq!(presence[2].1, DayPresence { presence: true, count: 1 });
        assert!(!presence[3].1.presence);
    }

    #[test]
    fn saturday_reports_the_whole_week() {
        let now = at("2025-06-14T23:00:00-08:00");
        assert_eq!(week_presence(&[], now).len(), 7);
    }

    #[test]
    fn month_bounds_are_local() {
        let now = at("2025-02-10T08:00:00-08:00");
        let (start, end) = current_month(now);

        assert_eq!(start, at("2025-02-01T00:00:00-08:00"));
        assert_eq!(end, at("2025-02-28T23:59:59.999-08:00"));
        assert_eq!(*start.offset(), local());
    }

    #[test]
    fn december_rolls_into_next_year() {
        let (_, end) = current_month(at("2024-12-31T10:00:00-08:00"));
        assert_eq!(end, at("2024-12-31T23:59:59.999-08:00"));
    }

    #[test]
    fn remaining_interview_message_pluralises_and_clamps() {
        assert_eq!(
            remaining_interviews_message(5, 2),
            "You need to schedule 3 more interviews this month to meet your goal of 5 interviews."
        );
        assert_eq!(
            remaining_interviews_message(3, 2),
            "You need to schedule 1 more interview this month to meet your goal of 3 interviews."
        );
        assert_eq!(
            remaining_interviews_message(2, 4),
            "You need to schedule 0 more interview this month to meet your goal of 2 interviews."
        );
        assert_eq!(
            remaining_interviews_message(2, u64::MAX),
            "You need to schedule 0 more interview this month to meet your goal of 2 interviews."
        );
    }

    #[test]
    fn conversion_rate_rounds_to_two_decimals() {
        assert_eq!(interview_rate(0, 0), 0.0);
        assert_eq!(interview_rate(3, 1), 33.33);
        assert_eq!(interview_rate(3, 2), 66.67);
        assert_eq!(interview_rate(4, 2), 50.0);
    }

    #[test]
    fn conversion_message_prints_the_rate_without_trailing_zeros() {
        assert_eq!(
            InterviewConversionRate::new(4, 2).message,
            "You have logged 2 interviews out of 4 applications. Your interview rate is 50%."
        );
        assert_eq!(
            InterviewConversionRate::new(3, 1).message,
            "You have logged 1 interviews out of 3 applications. Your interview rate is 33.33%."
        );
        assert_eq!(
            InterviewConversionRate::new(0, 0).message,
            "You have logged 0 interviews out of 0 applications. Your interview rate is 0%."
        );
    }
}

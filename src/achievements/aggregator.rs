//! Milestone crossing detection over a user's applications and interviews.

use chrono::{DateTime, FixedOffset, NaiveDate};
use uuid::Uuid;

use super::milestones::{INTERVIEW_MILESTONES, JOB_MILESTONES, is_milestone};
use super::presentation::AchievementView;
use crate::models::{AchievementCategory, interview, job};

/// Earned and not-yet-earned milestone badges for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MilestoneAwards {
    pub awarded: Vec<AchievementView>,
    pub locked: Vec<AchievementView>,
}

pub fn job_milestone_name(count: u32) -> String {
    format!("Applied to {count} Jobs")
}

pub fn interview_milestone_name(count: u32) -> String {
    format!("Attended {count} Interviews")
}

/// `M/D/YYYY`, the way dates read in badge descriptions.
pub(crate) fn format_event_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

fn job_view(user_id: Uuid, count: u32, achieved_on: Option<NaiveDate>) -> AchievementView {
    let description = match achieved_on {
        Some(date) => format!(
            "Awarded for applying to {count} jobs on {}.",
            format_event_date(date)
        ),
        None => format!("Awarded for applying to {count} jobs"),
    };
    AchievementView {
        id: format!("{user_id}-job-{count}"),
        name: job_milestone_name(count),
        description,
        unlocked: achieved_on.is_some(),
        category: AchievementCategory::Job,
        year: None,
        holiday: None,
        milestone: Some(count),
        achieved_on,
    }
}

fn interview_view(user_id: Uuid, count: u32, achieved_on: Option<NaiveDate>) -> AchievementView {
    let description = match achieved_on {
        Some(date) => format!(
            "Awarded for attending {count} interviews by {}.",
            format_event_date(date)
        ),
        None => format!("Awarded for attending {count} interviews"),
    };
    AchievementView {
        id: format!("{user_id}-interview-{count}"),
        name: interview_milestone_name(count),
        description,
        unlocked: achieved_on.is_some(),
        category: AchievementCategory::Interview,
        year: None,
        holiday: None,
        milestone: Some(count),
        achieved_on,
    }
}

/// Walks `timestamps` in chronological order and returns the local date on
/// which each threshold was reached, plus the final count.
fn crossings(
    mut timestamps: Vec<DateTime<FixedOffset>>,
    thresholds: &[u32],
    offset: FixedOffset,
) -> (Vec<(u32, NaiveDate)>, u32) {
    timestamps.sort();
    let mut count = 0u32;
    let mut crossed = Vec::new();
    for timestamp in timestamps {
        count += 1;
        if is_milestone(thresholds, count) {
            crossed.push((count, timestamp.with_timezone(&offset).date_naive()));
        }
    }
    (crossed, count)
}

/// Computes milestone badges. Only jobs that were actually applied to count;
/// interviews are ordered by the date they were accepted.
///
/// Every threshold ends up in exactly one of `awarded` or `locked`.
pub fn compute_milestones(
    user_id: Uuid,
    jobs: &[job::Model],
    interviews: &[interview::Model],
    offset: FixedOffset,
) -> MilestoneAwards {
    let job_times = jobs
        .iter()
        .filter(|job| job.status.is_applied())
        .map(|job| job.created_at)
        .collect();
    let interview_times = interviews.iter().map(|i| i.accepted_date).collect();

    let (job_crossings, job_count) = crossings(job_times, JOB_MILESTONES, offset);
    let (interview_crossings, interview_count) =
        crossings(interview_times, INTERVIEW_MILESTONES, offset);

    let mut awards = MilestoneAwards::default();

    for (count, date) in job_crossings {
        tracing::debug!(%user_id, milestone = count, %date, "Job milestone reached");
        awards.awarded.push(job_view(user_id, count, Some(date)));
    }
    for (count, date) in interview_crossings {
        tracing::debug!(%user_id, milestone = count, %date, "Interview milestone reached");
        awards.awarded.push(interview_view(user_id, count, Some(date)));
    }

    awards.locked.extend(
        JOB_MILESTONES
            .iter()
            .filter(|threshold| **threshold > job_count)
            .map(|threshold| job_view(user_id, *threshold, None)),
    );
    awards.locked.extend(
        INTERVIEW_MILESTONES
            .iter()
            .filter(|threshold| **threshold > interview_count)
            .map(|threshold| interview_view(user_id, *threshold, None)),
    );

    awards
}

//! Weekly application streak.
//!
//! A week runs from Sunday 00:00 to Saturday 23:59:59.999 in local server
//! time. The goal is met when the number of distinct local days with at least
//! one application reaches the user's days-per-week goal (a missing goal
//! counts as zero). The stored streak advances at most once per week and is
//! never reset here; a week with the goal unmet only shows a zero.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, NaiveTime, TimeDelta};
use uuid::Uuid;

use super::milestones::STREAK_TIERS;
use super::presentation::AchievementView;
use crate::models::AchievementCategory;

/// Inclusive bounds of one Sunday-to-Saturday week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekBounds {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl WeekBounds {
    pub fn contains(&self, instant: DateTime<FixedOffset>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Local midnight of `date` in `offset`.
pub(crate) fn local_midnight(date: NaiveDate, offset: FixedOffset) -> DateTime<FixedOffset> {
    let naive_utc =
        date.and_time(NaiveTime::MIN) - TimeDelta::seconds(i64::from(offset.local_minus_utc()));
    DateTime::from_naive_utc_and_offset(naive_utc, offset)
}

/// The week containing `now`, in `now`'s offset.
pub fn current_week(now: DateTime<FixedOffset>) -> WeekBounds {
    let today = now.date_naive();
    let sunday = today
        .checked_sub_days(Days::new(u64::from(today.weekday().num_days_from_sunday())))
        .unwrap_or(today);
    let start = local_midnight(sunday, *now.offset());
    let end = start + TimeDelta::days(7) - TimeDelta::milliseconds(1);
    WeekBounds { start, end }
}

/// Number of distinct local calendar days among `timestamps`.
pub fn distinct_application_days(
    timestamps: impl IntoIterator<Item = DateTime<FixedOffset>>,
    offset: FixedOffset,
) -> usize {
    timestamps
        .into_iter()
        .map(|ts| ts.with_timezone(&offset).date_naive())
        .collect::<HashSet<_>>()
        .len()
}

/// What to do with the stored streak this week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakDecision {
    /// Goal not met; the stored streak stays as it is.
    GoalUnmet,
    /// Goal met and already counted for this week.
    AlreadyCounted,
    /// Goal met for the first time this week; store `streak`.
    Advance { streak: i32 },
}

pub fn decide_streak(
    applied_days: usize,
    goal: Option<i32>,
    stored_streak: i32,
    last_update: Option<DateTime<FixedOffset>>,
    week_start: DateTime<FixedOffset>,
) -> StreakDecision {
    let goal = usize::try_from(goal.unwrap_or(0)).unwrap_or(0);
    if applied_days < goal {
        return StreakDecision::GoalUnmet;
    }

    match last_update {
        Some(updated) if updated >= week_start => StreakDecision::AlreadyCounted,
        _ => StreakDecision::Advance {
            streak: stored_streak.saturating_add(1),
        },
    }
}

/// Result of the weekly streak step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakOutcome {
    pub applied_days: usize,
    pub goal_met: bool,
    /// What the user is shown: zero while this week's goal is unmet
    pub displayed_streak: i32,
    /// What is stored on the user record
    pub persisted_streak: i32,
}

impl StreakOutcome {
    pub fn new(applied_days: usize, decision: StreakDecision, stored_streak: i32) -> Self {
        match decision {
            StreakDecision::GoalUnmet => Self {
                applied_days,
                goal_met: false,
                displayed_streak: 0,
                persisted_streak: stored_streak,
            },
            StreakDecision::AlreadyCounted => Self {
                applied_days,
                goal_met: true,
                displayed_streak: stored_streak,
                persisted_streak: stored_streak,
            },
            StreakDecision::Advance { streak } => Self {
                applied_days,
                goal_met: true,
                displayed_streak: streak,
                persisted_streak: streak,
            },
        }
    }
}

/// One view per streak tier, shortest first; a tier is unlocked once the
/// stored streak has reached it.
pub fn streak_views(user_id: Uuid, persisted_streak: i32) -> Vec<AchievementView> {
    STREAK_TIERS
        .iter()
        .rev()
        .map(|tier| AchievementView {
            id: format!("{user_id}-streak-{}", tier.weeks),
            name: tier.name.to_string(),
            description: tier.description.to_string(),
            unlocked: i64::from(persisted_streak) >= i64::from(tier.weeks),
            category: AchievementCategory::Streak,
            year: None,
            holiday: None,
            milestone: Some(tier.weeks),
            achieved_on: None,
        })
        .collect()
}

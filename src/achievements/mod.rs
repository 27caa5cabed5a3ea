//! Achievement and streak pipeline.
//!
//! [`AchievementService`] is the single entry point both the REST route and
//! the page adapter call. It reads a user's applications, interviews and
//! awarded catalogue through the query caches, computes milestone, holiday
//! and streak badges, persists newly earned ones and returns them grouped for
//! display.

pub mod aggregator;
pub mod holiday_detector;
pub mod holidays;
pub mod milestones;
pub mod presentation;
pub mod streak;

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Datelike, FixedOffset};
use metrics::{counter, histogram};
use sea_orm::{DatabaseConnection, DbErr};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::cache::{QueryCaches, user_achievements_tag, user_interviews_tag, user_jobs_tag};
use crate::clock::Clock;
use crate::error::AchievementError;
use crate::models::{AchievementCategory, interview, job};
use crate::repositories::{
    AchievementRepository, AwardedAchievement, InterviewRepository, JobRepository, UserRepository,
};

use aggregator::{MilestoneAwards, compute_milestones};
use holiday_detector::detect_holiday_achievements;
use holidays::HolidayCalendars;
use milestones::streak_tier;
use presentation::{AchievementView, group_for_display};
use streak::{StreakDecision, StreakOutcome, current_week, decide_streak, streak_views};

/// How failures to persist an individual award are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceMode {
    /// Log and skip the failed award; the response still shows it as earned.
    BestEffort,
    /// Abort the whole computation on the first failed award.
    FailFast,
}

/// Everything the achievements page shows.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AchievementsReport {
    pub job_achievements: Vec<AchievementView>,
    pub interview_achievements: Vec<AchievementView>,
    pub holiday_achievements: Vec<AchievementView>,
    pub streak_achievements: Vec<AchievementView>,
    /// Awards stored for the user, as of the cached read
    pub all_achievements: Vec<AwardedAchievement>,
    /// Streak shown to the user (0 while this week's goal is unmet)
    pub weekly_streak: i32,
    /// Streak stored on the user record
    pub persisted_weekly_streak: i32,
    pub applied_days_this_week: usize,
}

/// Orchestrates the achievement pipeline for one user at a time.
#[derive(Clone)]
pub struct AchievementService {
    users: UserRepository,
    jobs: JobRepository,
    interviews: InterviewRepository,
    achievements: AchievementRepository,
    caches: QueryCaches,
    calendars: Arc<HolidayCalendars>,
    clock: Arc<dyn Clock>,
}

impl AchievementService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        caches: QueryCaches,
        calendars: Arc<HolidayCalendars>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users: UserRepository::new(Arc::clone(&db)),
            jobs: JobRepository::new(Arc::clone(&db)),
            interviews: InterviewRepository::new(Arc::clone(&db)),
            achievements: AchievementRepository::new(db),
            caches,
            calendars,
            clock,
        }
    }

    /// Runs the full pipeline for `user_id`.
    #[instrument(skip_all, fields(user_id = %user_id, mode = ?mode))]
    pub async fn achievements_for(
        &self,
        user_id: Uuid,
        mode: PersistenceMode,
    ) -> Result<AchievementsReport, AchievementError> {
        let started = Instant::now();
        let now = self.clock.now();
        let offset = *now.offset();

        let (jobs, interviews, awarded) = tokio::try_join!(
            self.applied_jobs(user_id),
            self.scheduled_interviews(user_id),
            self.awarded_achievements(user_id),
        )?;
        debug!(
            jobs = jobs.len(),
            interviews = interviews.len(),
            awarded = awarded.len(),
            "Fetched achievement inputs"
        );

        let (milestones, streak) = tokio::try_join!(
            self.award_milestones(user_id, &jobs, &interviews, now, mode),
            self.update_weekly_streak(user_id, now, mode),
        )?;

        let holiday_views =
            detect_holiday_achievements(user_id, &jobs, &self.calendars, offset, now.year());

        let MilestoneAwards { awarded: earned, locked } = milestones;
        let grouped = group_for_display(
            earned
                .into_iter()
                .chain(locked)
                .chain(holiday_views)
                .chain(streak_views(user_id, streak.persisted_streak)),
        );

        info!(
            job_unlocked = grouped.job.iter().filter(|v| v.unlocked).count(),
            interview_unlocked = grouped.interview.iter().filter(|v| v.unlocked).count(),
            holiday_unlocked = grouped.holiday.iter().filter(|v| v.unlocked).count(),
            weekly_streak = streak.displayed_streak,
            applied_days = streak.applied_days,
            "Computed achievements"
        );
        histogram!("achievements_pipeline_duration_ms")
            .record(started.elapsed().as_secs_f64() * 1_000.0);

        Ok(AchievementsReport {
            job_achievements: grouped.job,
            interview_achievements: grouped.interview,
            holiday_achievements: grouped.holiday,
            streak_achievements: grouped.streak,
            all_achievements: awarded,
            weekly_streak: streak.displayed_streak,
            persisted_weekly_streak: streak.persisted_streak,
            applied_days_this_week: streak.applied_days,
        })
    }

    async fn applied_jobs(&self, user_id: Uuid) -> Result<Vec<job::Model>, AchievementError> {
        let tag = user_jobs_tag(user_id);
        Ok(self
            .caches
            .applied_jobs
            .get_or_try_load(tag.clone(), vec![tag], || self.jobs.applied_jobs(user_id))
            .await?)
    }

    async fn scheduled_interviews(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<interview::Model>, AchievementError> {
        let tag = user_interviews_tag(user_id);
        Ok(self
            .caches
            .interviews
            .get_or_try_load(tag.clone(), vec![tag], || {
                self.interviews.scheduled_for_user(user_id)
            })
            .await?)
    }

    async fn awarded_achievements(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<AwardedAchievement>, AchievementError> {
        let tag = user_achievements_tag(user_id);
        Ok(self
            .caches
            .awarded_achievements
            .get_or_try_load(tag.clone(), vec![tag], || {
                self.achievements.awarded_for_user(user_id)
            })
            .await?)
    }

    /// Computes milestone badges and stores the earned ones.
    async fn award_milestones(
        &self,
        user_id: Uuid,
        jobs: &[job::Model],
        interviews: &[interview::Model],
        now: DateTime<FixedOffset>,
        mode: PersistenceMode,
    ) -> Result<MilestoneAwards, AchievementError> {
        let awards = compute_milestones(user_id, jobs, interviews, *now.offset());

        let mut newly_awarded = 0;
        for view in &awards.awarded {
            if self
                .persist_award(user_id, &view.name, &view.description, view.category, now, mode)
                .await?
            {
                newly_awarded += 1;
            }
        }

        debug!(
            awarded = awards.awarded.len(),
            locked = awards.locked.len(),
            newly_awarded,
            "Milestones evaluated"
        );
        if newly_awarded > 0 {
            self.caches
                .invalidate_tag(&user_achievements_tag(user_id))
                .await;
        }

        Ok(awards)
    }

    /// Evaluates this week's goal, advances the stored streak when due and
    /// awards the matching streak tier.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn update_weekly_streak(
        &self,
        user_id: Uuid,
        now: DateTime<FixedOffset>,
        mode: PersistenceMode,
    ) -> Result<StreakOutcome, AchievementError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AchievementError::UserNotFound(user_id))?;

        let week = current_week(now);
        let this_week = self
            .jobs
            .applied_between(user_id, week.start, week.end)
            .await?;
        let applied_days =
            streak::distinct_application_days(this_week.iter().map(|j| j.created_at), *now.offset());

        let decision = decide_streak(
            applied_days,
            user.jobs_applied_to_days_per_week_goal,
            user.weekly_streak,
            user.last_streak_update,
            week.start,
        );

        if let StreakDecision::Advance { streak } = decision {
            self.users.record_streak(user_id, streak, week.start).await?;
            counter!("weekly_streak_updates_total").increment(1);
            info!(streak, applied_days, "Weekly streak advanced");
        }

        let outcome = StreakOutcome::new(applied_days, decision, user.weekly_streak);

        if outcome.goal_met
            && let Some(tier) = streak_tier(outcome.persisted_streak)
            && self
                .persist_award(
                    user_id,
                    tier.name,
                    tier.description,
                    AchievementCategory::Streak,
                    now,
                    mode,
                )
                .await?
        {
            info!(achievement = tier.name, "Streak achievement awarded");
            self.caches
                .invalidate_tag(&user_achievements_tag(user_id))
                .await;
        }

        Ok(outcome)
    }

    /// Upserts the definition and links it to the user. Returns whether a new
    /// link was created. In best-effort mode failures are logged and reported
    /// as "nothing new".
    async fn persist_award(
        &self,
        user_id: Uuid,
        name: &str,
        description: &str,
        category: AchievementCategory,
        now: DateTime<FixedOffset>,
        mode: PersistenceMode,
    ) -> Result<bool, AchievementError> {
        let result: Result<bool, DbErr> = async {
            let definition = self
                .achievements
                .upsert_definition(name, description, category)
                .await?;
            self.achievements.award(user_id, definition.id, now).await
        }
        .await;

        match result {
            Ok(inserted) => {
                if inserted {
                    counter!("achievements_awarded_total", "category" => category.as_str())
                        .increment(1);
                }
                Ok(inserted)
            }
            Err(source) => {
                counter!("achievement_persist_failures_total").increment(1);
                match mode {
                    PersistenceMode::FailFast => Err(AchievementError::Persistence {
                        name: name.to_string(),
                        source,
                    }),
                    PersistenceMode::BestEffort => {
                        warn!(achievement = name, error = %source, "Failed to persist achievement");
                        Ok(false)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, FixedOffset};
    use uuid::Uuid;

    use crate::models::{ApplicationStatus, interview, job};

    /// UTC-8, the offset fixtures are written in.
    pub fn local() -> FixedOffset {
        FixedOffset::west_opt(8 * 3600).unwrap()
    }

    pub fn job_on(user_id: Uuid, created_at: &str) -> job::Model {
        let created_at = DateTime::parse_from_rfc3339(created_at).unwrap();
        job::Model {
            id: Uuid::new_v4(),
            user_id,
            company: "Acme".to_string(),
            title: "Engineer".to_string(),
            status: ApplicationStatus::Applied,
            holiday_applied: None,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn interview_on(user_id: Uuid, accepted: &str) -> interview::Model {
        let accepted_date = DateTime::parse_from_rfc3339(accepted).unwrap();
        interview::Model {
            id: Uuid::new_v4(),
            user_id,
            job_id: None,
            accepted_date,
            interview_date: Some(accepted_date),
            created_at: accepted_date,
        }
    }
}

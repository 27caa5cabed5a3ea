//! "Applied on a holiday" badges.

use std::collections::HashSet;

use chrono::{Datelike, FixedOffset};
use uuid::Uuid;

use super::holidays::{HolidayCalendars, US_HOLIDAYS};
use super::presentation::AchievementView;
use crate::models::{AchievementCategory, job};

fn holiday_view(user_id: Uuid, holiday: &str, year: i32, unlocked: bool) -> AchievementView {
    let description = if unlocked {
        format!("Awarded for applying on {holiday} in {year}.")
    } else {
        format!("Awarded for applying on {holiday} in {year}")
    };
    AchievementView {
        id: format!("{user_id}-holiday-{holiday}-{year}"),
        name: format!("Applied on {holiday} {year}"),
        description,
        unlocked,
        category: AchievementCategory::Holiday,
        year: Some(year),
        holiday: Some(holiday.to_string()),
        milestone: None,
        achieved_on: None,
    }
}

/// Credits each holiday at most once, for the earliest application made on
/// it, and adds a locked placeholder for every other holiday that occurs in
/// `current_year`.
///
/// A job's stored `holiday_applied` tag wins over a calendar lookup of its
/// local creation date.
pub fn detect_holiday_achievements(
    user_id: Uuid,
    jobs: &[job::Model],
    calendars: &HolidayCalendars,
    offset: FixedOffset,
    current_year: i32,
) -> Vec<AchievementView> {
    let mut ordered: Vec<&job::Model> = jobs.iter().filter(|job| job.status.is_applied()).collect();
    ordered.sort_by_key(|job| job.created_at);

    let mut credited: HashSet<String> = HashSet::new();
    let mut views = Vec::new();

    for job in ordered {
        let local = job.created_at.with_timezone(&offset).date_naive();
        let holiday = job
            .holiday_applied
            .clone()
            .filter(|tag| !tag.is_empty())
            .or_else(|| calendars.holiday_on(local).map(str::to_string));

        if let Some(holiday) = holiday
            && credited.insert(holiday.clone())
        {
            tracing::debug!(%user_id, holiday = %holiday, year = local.year(), "Holiday badge earned");
            views.push(holiday_view(user_id, &holiday, local.year(), true));
        }
    }

    let calendar = calendars.calendar(current_year);
    views.extend(
        US_HOLIDAYS
            .iter()
            .filter(|holiday| !credited.contains(holiday.name) && calendar.contains(holiday.name))
            .map(|holiday| holiday_view(user_id, holiday.name, current_year, false)),
    );

    views
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::test_support::{job_on, local};

    fn unlocked(views: &[AchievementView]) -> Vec<&str> {
        views
            .iter()
            .filter(|v| v.unlocked)
            .map(|v| v.name.as_str())
            .collect()
    }

    #[test]
    fn independence_day_application_is_credited() {
        let user = Uuid::new_v4();
        let jobs = [job_on(user, "2025-07-04T11:00:00-08:00")];

        let views = detect_holiday_achievements(user, &jobs, &HolidayCalendars::new(), local(), 2025);

        assert_eq!(unlocked(&views), ["Applied on Independence Day 2025"]);
        let badge = &views[0];
        assert_eq!(badge.id, format!("{user}-holiday-Independence Day-2025"));
        assert_eq!(badge.description, "Awarded for applying on Independence Day in 2025.");
    }

    #[test]
    fn same_holiday_is_credited_once() {
        let user = Uuid::new_v4();
        let jobs = [
            job_on(user, "2025-12-25T09:00:00-08:00"),
            job_on(user, "2025-12-25T15:00:00-08:00"),
            job_on(user, "2024-12-25T15:00:00-08:00"),
        ];

        let views = detect_holiday_achievements(user, &jobs, &HolidayCalendars::new(), local(), 2025);

        // The earliest application wins, even across years.
        assert_eq!(unlocked(&views), ["Applied on Christmas Day 2024"]);
        assert!(!views.iter().any(|v| v.name.contains("Christmas") && !v.unlocked));
    }

    #[test]
    fn local_date_decides_the_holiday() {
        let user = Uuid::new_v4();
        // 2025-07-05 03:00 UTC is still July 4th at UTC-8.
        let jobs = [job_on(user, "2025-07-05T03:00:00Z")];

        let views = detect_holiday_achievements(user, &jobs, &HolidayCalendars::new(), local(), 2025);

        assert_eq!(unlocked(&views), ["Applied on Independence Day 2025"]);
    }

    #[test]
    fn stored_tag_overrides_calendar_lookup() {
        let user = Uuid::new_v4();
        let mut job = job_on(user, "2025-03-03T10:00:00-08:00");
        job.holiday_applied = Some("Halloween".to_string());

        let views = detect_holiday_achievements(user, &[job], &HolidayCalendars::new(), local(), 2025);

        assert_eq!(unlocked(&views), ["Applied on Halloween 2025"]);
    }

    #[test]
    fn holidays_sharing_a_date_each_get_a_placeholder() {
        let user = Uuid::new_v4();

        let views = detect_holiday_achievements(user, &[], &HolidayCalendars::new(), local(), 2025);

        assert_eq!(views.len(), US_HOLIDAYS.len());
        for name in [
            "Applied on Martin Luther King Jr. Day 2025",
            "Applied on Inauguration Day 2025",
        ] {
            assert!(views.iter().any(|v| v.name == name && !v.unlocked), "{name}");
        }
    }

    #[test]
    fn shared_date_credits_the_first_declared_holiday() {
        let user = Uuid::new_v4();
        let jobs = [job_on(user, "2025-01-20T10:00:00-08:00")];

        let views = detect_holiday_achievements(user, &jobs, &HolidayCalendars::new(), local(), 2025);

        assert_eq!(unlocked(&views), ["Applied on Martin Luther King Jr. Day 2025"]);
        assert!(
            views
                .iter()
                .any(|v| v.name == "Applied on Inauguration Day 2025" && !v.unlocked)
        );
        assert_eq!(views.len(), US_HOLIDAYS.len());
    }

    #[test]
    fn placeholders_cover_remaining_holidays_of_the_current_year() {
        let user = Uuid::new_v4();

        let views = detect_holiday_achievements(user, &[], &HolidayCalendars::new(), local(), 2026);

        // No inauguration in 2026.
        assert_eq!(views.len(), US_HOLIDAYS.len() - 1);
        assert!(views.iter().all(|v| !v.unlocked && v.year == Some(2026)));
        assert_eq!(
            views[0].description,
            "Awarded for applying on New Year's Day in 2026"
        );
    }
}

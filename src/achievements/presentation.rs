//! Display ordering and bucketing of achievement views.

use std::cmp::Ordering;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use utoipa::ToSchema;

use super::holidays::canonical_index;
use crate::models::AchievementCategory;

/// One badge as shown to the user, earned or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AchievementView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub unlocked: bool,
    pub category: AchievementCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holiday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<u32>,
    /// Local date the qualifying event happened on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achieved_on: Option<NaiveDate>,
}

static TRAILING_YEAR: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\d{4}$").ok());

/// Four-digit year at the end of a badge name, or 0.
fn name_year(name: &str) -> u32 {
    TRAILING_YEAR
        .as_ref()
        .and_then(|pattern| pattern.find(name))
        .and_then(|found| found.as_str().parse().ok())
        .unwrap_or(0)
}

/// Display order: unlocked first, then by trailing year, then by position in
/// the holiday list (falling back to comparing holiday names). Views that tie
/// on all keys keep their relative order under a stable sort.
pub fn display_order(a: &AchievementView, b: &AchievementView) -> Ordering {
    b.unlocked
        .cmp(&a.unlocked)
        .then_with(|| name_year(&a.name).cmp(&name_year(&b.name)))
        .then_with(|| {
            let holiday_a = a.holiday.as_deref().unwrap_or("");
            let holiday_b = b.holiday.as_deref().unwrap_or("");
            match (canonical_index(holiday_a), canonical_index(holiday_b)) {
                (Some(index_a), Some(index_b)) => index_a.cmp(&index_b),
                _ => holiday_a.cmp(holiday_b),
            }
        })
}

/// Views partitioned by category, each bucket in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedAchievements {
    pub job: Vec<AchievementView>,
    pub interview: Vec<AchievementView>,
    pub holiday: Vec<AchievementView>,
    pub streak: Vec<AchievementView>,
}

pub fn group_for_display(views: impl IntoIterator<Item = AchievementView>) -> GroupedAchievements {
    let mut grouped = GroupedAchievements::default();
    for view in views {
        let bucket = match view.category {
            AchievementCategory::Job => &mut grouped.job,
            AchievementCategory::Interview => &mut grouped.interview,
            AchievementCategory::Holiday => &mut grouped.holiday,
            AchievementCategory::Streak => &mut grouped.streak,
        };
        bucket.push(view);
    }

    for bucket in [
        &mut grouped.job,
        &mut grouped.interview,
        &mut grouped.holiday,
        &mut grouped.streak,
    ] {
        bucket.sort_by(display_order);
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(name: &str, unlocked: bool, category: AchievementCategory) -> AchievementView {
        AchievementView {
            id: name.to_string(),
            name: name.to_string(),
            description: String::new(),
            unlocked,
            category,
            year: None,
            holiday: None,
            milestone: None,
            achieved_on: None,
        }
    }

    fn holiday(holiday: &str, year: i32, unlocked: bool) -> AchievementView {
        AchievementView {
            year: Some(year),
            holiday: Some(holiday.to_string()),
            ..view(
                &format!("Applied on {holiday} {year}"),
                unlocked,
                AchievementCategory::Holiday,
            )
        }
    }

    #[test]
    fn unlocked_sorts_before_locked_regardless_of_year() {
        let locked = holiday("Halloween", 2024, false);
        let unlocked = holiday("Halloween", 2020, true);
        assert_eq!(display_order(&unlocked, &locked), Ordering::Less);
        assert_eq!(display_order(&locked, &unlocked), Ordering::Greater);
    }

    #[test]
    fn holidays_follow_year_then_calendar_order() {
        let grouped = group_for_display([
            holiday("Christmas Day", 2023, true),
            holiday("Independence Day", 2024, true),
            holiday("New Year's Day", 2024, true),
            holiday("Easter", 2025, false),
            holiday("Juneteenth", 2025, false),
        ]);

        let names: Vec<&str> = grouped.holiday.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Applied on Christmas Day 2023",
                "Applied on New Year's Day 2024",
                "Applied on Independence Day 2024",
                "Applied on Easter 2025",
                "Applied on Juneteenth 2025",
            ]
        );
    }

    #[test]
    fn milestone_order_is_preserved_within_a_lock_state() {
        let grouped = group_for_display([
            view("Applied to 10 Jobs", true, AchievementCategory::Job),
            view("Applied to 25 Jobs", true, AchievementCategory::Job),
            view("Applied to 50 Jobs", false, AchievementCategory::Job),
            view("Applied to 100 Jobs", false, AchievementCategory::Job),
        ]);

        let names: Vec<&str> = grouped.job.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Applied to 10 Jobs",
                "Applied to 25 Jobs",
                "Applied to 50 Jobs",
                "Applied to 100 Jobs",
            ]
        );
    }

    #[test]
    fn views_are_bucketed_by_category_not_by_name() {
        let grouped = group_for_display([
            view("Attended 1 Interviews", true, AchievementCategory::Interview),
            view("Committed", true, AchievementCategory::Streak),
            // Would have been mis-filed by a name-prefix test.
            view("Applied to 10 Jobs", false, AchievementCategory::Streak),
        ]);

        assert_eq!(grouped.interview.len(), 1);
        assert_eq!(grouped.streak.len(), 2);
        assert!(grouped.job.is_empty());
    }

    #[test]
    fn trailing_year_parsing() {
        assert_eq!(name_year("Applied on Halloween 2024"), 2024);
        assert_eq!(name_year("Applied to 1000 Jobs"), 0);
    }
}

//! US holiday calendar.
//!
//! Holidays are declared once as rules and resolved per year on demand.
//! Resolved years are memoised in [`HolidayCalendars`], so a long-running
//! process picks up a new year the first time a date in it is looked up.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// How a holiday's date is found in a given year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolidayRule {
    /// Same month and day every year. `special` dates only occur in US
    /// inauguration years (the year after a presidential election).
    Fixed { month: u32, day: u32, special: bool },
    /// The `n`th `weekday` of `month`, counting from 1.
    NthWeekday { month: u32, weekday: Weekday, n: u32 },
    /// The last `weekday` of `month`.
    LastWeekday { month: u32, weekday: Weekday },
    /// Resolved by a handler registered under this name.
    Named(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Holiday {
    pub name: &'static str,
    pub rule: HolidayRule,
}

/// Every holiday that can earn a badge, in display order.
pub const US_HOLIDAYS: &[Holiday] = &[
    Holiday {
        name: "New Year's Day",
        rule: HolidayRule::Fixed { month: 1, day: 1, special: false },
    },
    Holiday {
        name: "Martin Luther King Jr. Day",
        rule: HolidayRule::NthWeekday { month: 1, weekday: Weekday::Mon, n: 3 },
    },
    Holiday {
        name: "Inauguration Day",
        rule: HolidayRule::Fixed { month: 1, day: 20, special: true },
    },
    Holiday {
        name: "President's Day",
        rule: HolidayRule::NthWeekday { month: 2, weekday: Weekday::Mon, n: 3 },
    },
    Holiday {
        name: "Easter",
        rule: HolidayRule::Named("easter"),
    },
    Holiday {
        name: "Memorial Day",
        rule: HolidayRule::LastWeekday { month: 5, weekday: Weekday::Mon },
    },
    Holiday {
        name: "Juneteenth",
        rule: HolidayRule::Fixed { month: 6, day: 19, special: false },
    },
    Holiday {
        name: "Independence Day",
        rule: HolidayRule::Fixed { month: 7, day: 4, special: false },
    },
    Holiday {
        name: "Labor Day",
        rule: HolidayRule::NthWeekday { month: 9, weekday: Weekday::Mon, n: 1 },
    },
    Holiday {
        name: "Columbus Day",
        rule: HolidayRule::NthWeekday { month: 10, weekday: Weekday::Mon, n: 2 },
    },
    Holiday {
        name: "Halloween",
        rule: HolidayRule::Fixed { month: 10, day: 31, special: false },
    },
    Holiday {
        name: "Veterans Day",
        rule: HolidayRule::Fixed { month: 11, day: 11, special: false },
    },
    Holiday {
        name: "Thanksgiving Day",
        rule: HolidayRule::Named("fourth_thursday_in_november"),
    },
    Holiday {
        name: "Christmas Day",
        rule: HolidayRule::Fixed { month: 12, day: 25, special: false },
    },
];

/// Position of `name` in [`US_HOLIDAYS`].
pub fn canonical_index(name: &str) -> Option<usize> {
    US_HOLIDAYS.iter().position(|holiday| holiday.name == name)
}

type NamedHandler = fn(i32) -> Option<NaiveDate>;

fn named_handler(name: &str) -> Option<NamedHandler> {
    match name {
        "easter" => Some(easter_sunday as NamedHandler),
        "fourth_thursday_in_november" => Some(fourth_thursday_in_november as NamedHandler),
        _ => None,
    }
}

impl HolidayRule {
    /// The date this rule falls on in `year`, if it occurs that year.
    pub fn resolve(&self, year: i32) -> Option<NaiveDate> {
        match *self {
            HolidayRule::Fixed { month, day, special } => {
                if special && year.rem_euclid(4) != 1 {
                    return None;
                }
                NaiveDate::from_ymd_opt(year, month, day)
            }
            HolidayRule::NthWeekday { month, weekday, n } => nth_weekday(year, month, weekday, n),
            HolidayRule::LastWeekday { month, weekday } => last_weekday(year, month, weekday),
            HolidayRule::Named(handler) => named_handler(handler).and_then(|resolve| resolve(year)),
        }
    }
}

fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u32) -> Option<NaiveDate> {
    if n == 0 {
        return None;
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let offset = (7 + weekday.num_days_from_sunday() - first.weekday().num_days_from_sunday()) % 7;
    let date = first.checked_add_days(Days::new(u64::from(offset + 7 * (n - 1))))?;
    (date.month() == month).then_some(date)
}

fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let mut date = NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()?;
    while date.weekday() != weekday {
        date = date.pred_opt()?;
    }
    Some(date)
}

fn fourth_thursday_in_november(year: i32) -> Option<NaiveDate> {
    nth_weekday(year, 11, Weekday::Thu, 4)
}

/// Gregorian Easter Sunday (anonymous computus).
fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)
}

/// All holidays of one year, keyed by `"MM-DD"`.
///
/// When two holidays share a date the one declared first in [`US_HOLIDAYS`]
/// owns the date; both still count as occurring that year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayCalendar {
    year: i32,
    resolved: Vec<(&'static str, NaiveDate)>,
    by_month_day: HashMap<String, &'static str>,
}

impl HolidayCalendar {
    /// Resolves every rule in [`US_HOLIDAYS`] for `year`. Rules that do not
    /// resolve are left out.
    pub fn for_year(year: i32) -> Self {
        let resolved: Vec<(&'static str, NaiveDate)> = US_HOLIDAYS
            .iter()
            .filter_map(|holiday| holiday.rule.resolve(year).map(|date| (holiday.name, date)))
            .collect();

        let mut by_month_day = HashMap::with_capacity(resolved.len());
        for (name, date) in &resolved {
            by_month_day.entry(month_day_key(*date)).or_insert(*name);
        }

        Self {
            year,
            resolved,
            by_month_day,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// The holiday falling on `date`, provided `date` is in this calendar's year.
    pub fn holiday_on(&self, date: NaiveDate) -> Option<&'static str> {
        if date.year() != self.year {
            return None;
        }
        self.by_month_day.get(&month_day_key(date)).copied()
    }

    /// Date of `name` in this calendar's year.
    pub fn date_of(&self, name: &str) -> Option<NaiveDate> {
        self.resolved
            .iter()
            .find(|(holiday, _)| *holiday == name)
            .map(|(_, date)| *date)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.date_of(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

fn month_day_key(date: NaiveDate) -> String {
    format!("{:02}-{:02}", date.month(), date.day())
}

/// Lazily resolved calendars, one per year seen.
#[derive(Debug, Default)]
pub struct HolidayCalendars {
    years: RwLock<HashMap<i32, Arc<HolidayCalendar>>>,
}

impl HolidayCalendars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calendar(&self, year: i32) -> Arc<HolidayCalendar> {
        if let Some(calendar) = self
            .years
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&year)
        {
            return Arc::clone(calendar);
        }

        let mut years = self.years.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(years.entry(year).or_insert_with(|| {
            let calendar = HolidayCalendar::for_year(year);
            tracing::debug!(year, holidays = calendar.len(), "Resolved holiday calendar");
            Arc::new(calendar)
        }))
    }

    /// The holiday falling on `date`, if any.
    pub fn holiday_on(&self, date: NaiveDate) -> Option<&'static str> {
        self.calendar(date.year()).holiday_on(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn floating_holidays_2024() {
        let calendar = HolidayCalendar::for_year(2024);
        assert_eq!(calendar.holiday_on(ymd(2024, 1, 15)), Some("Martin Luther King Jr. Day"));
        assert_eq!(calendar.holiday_on(ymd(2024, 2, 19)), Some("President's Day"));
        assert_eq!(calendar.holiday_on(ymd(2024, 5, 27)), Some("Memorial Day"));
        assert_eq!(calendar.holiday_on(ymd(2024, 9, 2)), Some("Labor Day"));
        assert_eq!(calendar.holiday_on(ymd(2024, 10, 14)), Some("Columbus Day"));
        assert_eq!(calendar.holiday_on(ymd(2024, 11, 28)), Some("Thanksgiving Day"));
    }

    #[test]
    fn easter_dates() {
        assert_eq!(easter_sunday(2024), Some(ymd(2024, 3, 31)));
        assert_eq!(easter_sunday(2025), Some(ymd(2025, 4, 20)));
        assert_eq!(easter_sunday(2026), Some(ymd(2026, 4, 5)));
    }

    #[test]
    fn nth_weekday_when_month_starts_on_that_weekday() {
        // September 2025 starts on a Monday.
        assert_eq!(nth_weekday(2025, 9, Weekday::Mon, 1), Some(ymd(2025, 9, 1)));
        assert_eq!(nth_weekday(2025, 9, Weekday::Mon, 5), Some(ymd(2025, 9, 29)));
        assert_eq!(nth_weekday(2025, 9, Weekday::Mon, 6), None);
    }

    #[test]
    fn last_weekday_when_month_ends_on_that_weekday() {
        // May 2021 ends on a Monday.
        assert_eq!(last_weekday(2021, 5, Weekday::Mon), Some(ymd(2021, 5, 31)));
        assert_eq!(last_weekday(2025, 12, Weekday::Wed), Some(ymd(2025, 12, 31)));
    }

    #[test]
    fn inauguration_day_only_in_inauguration_years() {
        assert_eq!(
            HolidayCalendar::for_year(2029).holiday_on(ymd(2029, 1, 20)),
            Some("Inauguration Day")
        );
        assert!(HolidayCalendar::for_year(2025).contains("Inauguration Day"));
        assert!(!HolidayCalendar::for_year(2026).contains("Inauguration Day"));
    }

    #[test]
    fn shared_dates_keep_both_holidays() {
        // MLK Day 2025 is the third Monday of January, which is Jan 20.
        let calendar = HolidayCalendar::for_year(2025);
        assert_eq!(calendar.len(), US_HOLIDAYS.len());
        assert!(calendar.contains("Martin Luther King Jr. Day"));
        assert!(calendar.contains("Inauguration Day"));
        assert_eq!(calendar.date_of("Martin Luther King Jr. Day"), Some(ymd(2025, 1, 20)));
        assert_eq!(
            calendar.holiday_on(ymd(2025, 1, 20)),
            Some("Martin Luther King Jr. Day")
        );
    }

    #[test]
    fn unknown_named_rules_are_skipped() {
        assert_eq!(HolidayRule::Named("groundhog_day").resolve(2025), None);
    }

    #[test]
    fn lookups_check_the_year() {
        let calendar = HolidayCalendar::for_year(2024);
        assert_eq!(calendar.holiday_on(ymd(2025, 7, 4)), None);
        assert_eq!(calendar.holiday_on(ymd(2024, 7, 4)), Some("Independence Day"));
    }

    #[test]
    fn calendars_are_resolved_per_year_and_reused() {
        let calendars = HolidayCalendars::new();
        let first = calendars.calendar(2030);
        let second = calendars.calendar(2030);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calendars.holiday_on(ymd(2031, 12, 25)), Some("Christmas Day"));
        assert_eq!(calendars.calendar(2031).year(), 2031);
    }

    #[test]
    fn canonical_order_matches_declaration() {
        assert_eq!(canonical_index("New Year's Day"), Some(0));
        assert_eq!(canonical_index("Christmas Day"), Some(US_HOLIDAYS.len() - 1));
        assert_eq!(canonical_index("Arbor Day"), None);
    }
}

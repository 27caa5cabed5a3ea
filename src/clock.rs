//! Source of "now" for everything that depends on the calendar.

use chrono::{DateTime, FixedOffset, Local, Utc};

use crate::config::AppConfig;

/// Supplies the current instant in the zone treated as local server time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock, either in a configured fixed offset or the host's zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    offset: Option<FixedOffset>,
}

impl SystemClock {
    pub fn new(offset: Option<FixedOffset>) -> Self {
        Self { offset }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.utc_offset())
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        match self.offset {
            Some(offset) => Utc::now().with_timezone(&offset),
            None => Local::now().fixed_offset(),
        }
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_honours_configured_offset() {
        let offset = FixedOffset::west_opt(8 * 3600).unwrap();
        let now = SystemClock::new(Some(offset)).now();
        assert_eq!(now.offset().local_minus_utc(), -8 * 3600);
    }

    #[test]
    fn fixed_clock_never_moves() {
        let instant = DateTime::parse_from_rfc3339("2025-07-04T09:30:00-07:00").unwrap();
        let clock = FixedClock(instant);
        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), clock.now());
    }
}

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::HubtasksError;

/// Source of "now" for the scheduler.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Local wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Parse `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS` (a space separator is accepted too).
pub fn parse_instant(raw: &str) -> Result<NaiveDateTime, HubtasksError> {
    let raw = raw.trim();
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(instant) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(instant);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::default()))
        .map_err(|_| {
            HubtasksError::validation(format!(
                "Invalid date '{raw}': expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS"
            ))
        })
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, HubtasksError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| HubtasksError::validation(format!("Invalid date '{raw}': expected YYYY-MM-DD")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_instant_forms() {
        let date = parse_instant("2024-01-10").unwrap();
        assert_eq!(date.to_string(), "2024-01-10 00:00:00");

        let with_time = parse_instant("2024-01-10T15:30:00").unwrap();
        assert_eq!(with_time.to_string(), "2024-01-10 15:30:00");

        assert!(parse_instant("10/01/2024").is_err());
        assert!(parse_instant("2024-02-30").is_err());
    }

    #[test]
    fn test_fixed_clock_today() {
        let clock = FixedClock(parse_instant("2024-01-10T23:59:59").unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    }
}

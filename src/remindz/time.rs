//! Point-in-time values for reminders.
//!
//! A [`ReminderTime`] is a calendar date with an optional time of day at minute
//! precision. Its text form is the one cached on disk:
//!
//! - `2024-01-01` (date only)
//! - `2024-01-01T09:00` (date and time)
//!
//! [`FromStr`] and [`Display`](fmt::Display) are inverses for both forms.

use crate::error::{RemindzError, Result};
use chrono::{NaiveDate, NaiveTime};
use std::fmt;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReminderTime {
    date: NaiveDate,
    time: Option<NaiveTime>,
}

impl ReminderTime {
    pub fn new(date: NaiveDate, time: Option<NaiveTime>) -> Self {
        Self { date, time }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time(&self) -> Option<NaiveTime> {
        self.time
    }

    pub fn has_time(&self) -> bool {
        self.time.is_some()
    }

    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }
}

impl FromStr for ReminderTime {
    type Err = RemindzError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || RemindzError::InvalidTime(s.to_string());
        let (date_part, time_part) = match s.split_once('T') {
            Some((d, t)) => (d, Some(t)),
            None => (s, None),
        };
        let date = NaiveDate::parse_from_str(date_part, DATE_FORMAT).map_err(|_| invalid())?;
        let time = match time_part {
            Some(t) => Some(NaiveTime::parse_from_str(t, TIME_FORMAT).map_err(|_| invalid())?),
            None => None,
        };
        Ok(Self { date, time })
    }
}

impl fmt::Display for ReminderTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format(DATE_FORMAT))?;
        if let Some(time) = self.time {
            write!(f, "T{}", time.format(TIME_FORMAT))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_and_time() {
        let t = ReminderTime::parse("2024-01-01T09:00").unwrap();
        assert_eq!(t.date(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(t.time(), NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(t.to_string(), "2024-01-01T09:00");
    }

    #[test]
    fn test_parse_date_only() {
        let t = ReminderTime::parse("2023-12-31").unwrap();
        assert!(!t.has_time());
        assert_eq!(t.to_string(), "2023-12-31");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "tomorrow", "2024-13-01", "2024-01-01T25:00", "2024-01-01T"] {
            assert!(
                matches!(ReminderTime::parse(bad), Err(RemindzError::InvalidTime(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_ordering_puts_date_only_first() {
        let date_only = ReminderTime::parse("2024-01-01").unwrap();
        let morning = ReminderTime::parse("2024-01-01T08:00").unwrap();
        let next_day = ReminderTime::parse("2024-01-02").unwrap();
        assert!(date_only < morning);
        assert!(morning < next_day);
    }
}

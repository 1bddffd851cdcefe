//! Schedule metadata attached to a pattern.
//!
//! A pattern runs on a set of service days and either carries fixed-time
//! trips or a frequency window (one departure every `headway` seconds).

use chrono::{Datelike, NaiveDate, Weekday};

use crate::models::errors::{PatternError, Result};

/// Which kinds of days a pattern runs on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceDays {
    pub(crate) flags: u8,
}

impl ServiceDays {
    const WEEKDAY: u8 = 1;
    const SATURDAY: u8 = 1 << 1;
    const SUNDAY: u8 = 1 << 2;

    pub fn new() -> Self {
        Self { flags: 0 }
    }

    pub fn from_bools(weekday: bool, saturday: bool, sunday: bool) -> Self {
        let mut flags = 0;
        if weekday { flags |= Self::WEEKDAY; }
        if saturday { flags |= Self::SATURDAY; }
        if sunday { flags |= Self::SUNDAY; }
        Self { flags }
    }

    pub fn weekday(&self) -> bool {
        self.flags & Self::WEEKDAY != 0
    }

    pub fn saturday(&self) -> bool {
        self.flags & Self::SATURDAY != 0
    }

    pub fn sunday(&self) -> bool {
        self.flags & Self::SUNDAY != 0
    }

    pub fn contains(&self, day: Weekday) -> bool {
        match day {
            Weekday::Sat => self.saturday(),
            Weekday::Sun => self.sunday(),
            _ => self.weekday(),
        }
    }

    /// Check if the pattern runs on a given date
    pub fn runs_on(&self, date: NaiveDate) -> bool {
        self.contains(date.weekday())
    }
}

/// How trips on a pattern are scheduled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScheduleWindow {
    /// Each trip carries its own stop-times
    #[default]
    FixedTimes,
    /// Departures every `headway` seconds from `start_time` through `end_time`
    Frequency {
        start_time: u32,
        end_time: u32,
        headway: u32,
    },
}

impl ScheduleWindow {
    pub fn frequency(start_time: u32, end_time: u32, headway: u32) -> Result<Self> {
        if headway == 0 {
            return Err(PatternError::InvalidSchedule(
                "headway must be positive".into(),
            ));
        }
        if end_time < start_time {
            return Err(PatternError::InvalidSchedule(format!(
                "window ends ({}) before it starts ({})",
                end_time, start_time
            )));
        }
        Ok(Self::Frequency {
            start_time,
            end_time,
            headway,
        })
    }

    pub fn is_frequency(&self) -> bool {
        matches!(self, Self::Frequency { .. })
    }

    /// Departure times generated by a frequency window. Empty for fixed-time
    /// schedules.
    pub fn departures(&self) -> impl Iterator<Item = u32> {
        let (start, end, step) = match *self {
            Self::Frequency {
                start_time,
                end_time,
                headway,
            } if headway > 0 => (start_time, end_time, headway as usize),
            _ => (1, 0, 1),
        };
        (start..=end).step_by(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_days() {
        let days = ServiceDays::from_bools(true, false, true);

        assert!(days.weekday());
        assert!(!days.saturday());
        assert!(days.sunday());

        assert!(days.runs_on(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())); // Tuesday
        assert!(!days.runs_on(NaiveDate::from_ymd_opt(2024, 1, 6).unwrap())); // Saturday
        assert!(days.runs_on(NaiveDate::from_ymd_opt(2024, 1, 7).unwrap())); // Sunday
    }

    #[test]
    fn test_no_service_days() {
        let days = ServiceDays::new();
        assert!(!days.contains(Weekday::Mon));
        assert!(!days.contains(Weekday::Sat));
    }

    #[test]
    fn test_frequency_departures() {
        let window = ScheduleWindow::frequency(3600, 5400, 600).unwrap();
        assert!(window.is_frequency());
        assert_eq!(
            window.departures().collect::<Vec<_>>(),
            vec![3600, 4200, 4800, 5400]
        );

        assert_eq!(ScheduleWindow::FixedTimes.departures().count(), 0);
    }

    #[test]
    fn test_invalid_frequency() {
        assert!(matches!(
            ScheduleWindow::frequency(0, 100, 0),
            Err(PatternError::InvalidSchedule(_))
        ));
        assert!(matches!(
            ScheduleWindow::frequency(200, 100, 10),
            Err(PatternError::InvalidSchedule(_))
        ));
    }
}

//! Court working-day calendar
//!
//! The simulation advances one court working day at a time. Weekends and
//! configured holidays are non-working: no hearings are listed and every
//! courtroom's effective capacity is zero on those dates. The calendar is
//! pure date arithmetic; it holds no mutable simulation state.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Working-day calendar for a simulation run
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use court_simulator_core_rs::CourtCalendar;
///
/// let calendar = CourtCalendar::new(vec![]);
/// let friday = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
/// let saturday = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
///
/// assert!(calendar.is_working_day(friday));
/// assert!(!calendar.is_working_day(saturday));
///
/// // Next working day after Friday skips the weekend
/// let monday = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
/// assert_eq!(calendar.next_working_day(friday), monday);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourtCalendar {
    /// Court holidays (non-working regardless of weekday)
    holidays: HashSet<NaiveDate>,
}

impl CourtCalendar {
    /// Create a calendar with the given holiday list.
    pub fn new(holidays: Vec<NaiveDate>) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Whether the court sits on this date (weekday and not a holiday).
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.holidays.contains(&date)
    }

    /// Whether this date is a configured holiday.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    /// First working day strictly after `date`.
    pub fn next_working_day(&self, date: NaiveDate) -> NaiveDate {
        let mut d = date + Duration::days(1);
        while !self.is_working_day(d) {
            d = d + Duration::days(1);
        }
        d
    }

    /// First working day on or after `date`.
    pub fn first_working_day_on_or_after(&self, date: NaiveDate) -> NaiveDate {
        if self.is_working_day(date) {
            date
        } else {
            self.next_working_day(date)
        }
    }

    /// Number of configured holidays.
    pub fn num_holidays(&self) -> usize {
        self.holidays.len()
    }
}

/// Elapsed calendar days from `from` to `to` (negative if `to` precedes `from`).
///
/// Used for age computation, minimum-gap eligibility, and the periodic
/// ripeness review interval — all of which count calendar days, not
/// working days.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekend_is_not_working() {
        let calendar = CourtCalendar::new(vec![]);

        assert!(calendar.is_working_day(date(2024, 1, 5))); // Friday
        assert!(!calendar.is_working_day(date(2024, 1, 6))); // Saturday
        assert!(!calendar.is_working_day(date(2024, 1, 7))); // Sunday
        assert!(calendar.is_working_day(date(2024, 1, 8))); // Monday
    }

    #[test]
    fn test_holiday_is_not_working() {
        let republic_day = date(2024, 1, 26); // a Friday
        let calendar = CourtCalendar::new(vec![republic_day]);

        assert!(calendar.is_holiday(republic_day));
        assert!(!calendar.is_working_day(republic_day));
    }

    #[test]
    fn test_next_working_day_skips_weekend_and_holiday() {
        // Friday 2024-01-26 is a holiday; Saturday/Sunday follow.
        let calendar = CourtCalendar::new(vec![date(2024, 1, 26)]);

        assert_eq!(
            calendar.next_working_day(date(2024, 1, 25)),
            date(2024, 1, 29)
        );
    }

    #[test]
    fn test_first_working_day_on_or_after() {
        let calendar = CourtCalendar::new(vec![]);

        assert_eq!(
            calendar.first_working_day_on_or_after(date(2024, 1, 8)),
            date(2024, 1, 8)
        );
        assert_eq!(
            calendar.first_working_day_on_or_after(date(2024, 1, 6)),
            date(2024, 1, 8)
        );
    }

    #[test]
    fn test_days_between() {
        assert_eq!(days_between(date(2024, 1, 1), date(2024, 1, 8)), 7);
        assert_eq!(days_between(date(2024, 1, 8), date(2024, 1, 1)), -7);
        assert_eq!(days_between(date(2024, 1, 1), date(2024, 1, 1)), 0);
    }
}

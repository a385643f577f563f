//! Courtroom model
//!
//! A daily-capacity-bounded resource. Each courtroom hears at most
//! `daily_capacity` cases per working day; effective capacity drops to
//! zero on weekends and holidays. The per-day heard count (cases actually
//! heard, not merely listed) is the courtroom's utilization record.
//!
//! Courtrooms are owned exclusively by one simulation run and carry no
//! state across runs.

use crate::core::calendar::CourtCalendar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A courtroom with a fixed daily hearing capacity
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use court_simulator_core_rs::{CourtCalendar, Courtroom};
///
/// let room = Courtroom::new("CR-01".to_string(), "J-101".to_string(), 20);
/// let calendar = CourtCalendar::new(vec![]);
///
/// let monday = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
/// let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
///
/// assert_eq!(room.effective_capacity(monday, &calendar), 20);
/// assert_eq!(room.effective_capacity(sunday, &calendar), 0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Courtroom {
    /// Unique courtroom identifier (e.g., "CR-01")
    id: String,

    /// Presiding judge identifier (informational only)
    judge_id: String,

    /// Maximum cases heard per working day
    daily_capacity: u32,

    /// Cases actually heard per day (utilization record).
    /// BTreeMap keeps reporting iteration in date order.
    heard_by_day: BTreeMap<NaiveDate, u32>,
}

impl Courtroom {
    /// Create a new courtroom.
    ///
    /// # Panics
    /// Panics if `id` is empty.
    pub fn new(id: String, judge_id: String, daily_capacity: u32) -> Self {
        assert!(!id.is_empty(), "courtroom id must not be empty");
        Self {
            id,
            judge_id,
            daily_capacity,
            heard_by_day: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn judge_id(&self) -> &str {
        &self.judge_id
    }

    pub fn daily_capacity(&self) -> u32 {
        self.daily_capacity
    }

    /// Capacity effectively available on `date`: zero on non-working days,
    /// the configured daily capacity otherwise.
    pub fn effective_capacity(&self, date: NaiveDate, calendar: &CourtCalendar) -> u32 {
        if calendar.is_working_day(date) {
            self.daily_capacity
        } else {
            0
        }
    }

    /// Record how many assigned cases were actually heard on `date`.
    pub fn record_heard(&mut self, date: NaiveDate, count: u32) {
        *self.heard_by_day.entry(date).or_insert(0) += count;
    }

    /// Cases heard on a specific day.
    pub fn heard_on(&self, date: NaiveDate) -> u32 {
        self.heard_by_day.get(&date).copied().unwrap_or(0)
    }

    /// Total cases heard over the run so far.
    pub fn total_heard(&self) -> u64 {
        self.heard_by_day.values().map(|&c| c as u64).sum()
    }

    /// Number of days with at least one recorded hearing.
    pub fn days_active(&self) -> usize {
        self.heard_by_day.values().filter(|&&c| c > 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    #[should_panic(expected = "courtroom id must not be empty")]
    fn test_empty_id_panics() {
        Courtroom::new(String::new(), "J-1".to_string(), 10);
    }

    #[test]
    fn test_effective_capacity_zero_on_holiday() {
        let holiday = date(2024, 3, 25); // a Monday
        let calendar = CourtCalendar::new(vec![holiday]);
        let room = Courtroom::new("CR-01".to_string(), "J-1".to_string(), 15);

        assert_eq!(room.effective_capacity(holiday, &calendar), 0);
        assert_eq!(room.effective_capacity(date(2024, 3, 26), &calendar), 15);
    }

    #[test]
    fn test_utilization_record() {
        let mut room = Courtroom::new("CR-01".to_string(), "J-1".to_string(), 15);

        room.record_heard(date(2024, 1, 8), 12);
        room.record_heard(date(2024, 1, 9), 0);
        room.record_heard(date(2024, 1, 10), 7);

        assert_eq!(room.heard_on(date(2024, 1, 8)), 12);
        assert_eq!(room.heard_on(date(2024, 1, 11)), 0);
        assert_eq!(room.total_heard(), 19);
        assert_eq!(room.days_active(), 2);
    }
}

//! Daily aggregate metrics
//!
//! One row per simulated day, derived purely from that day's events and
//! never mutated after being written.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily metrics row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMetrics {
    /// Simulated date
    pub date: NaiveDate,

    /// Non-disposed cases at end of day
    pub total_cases: usize,

    /// Cases listed for hearing this day
    pub scheduled: usize,

    /// Listed cases actually heard
    pub heard: usize,

    /// Listed cases adjourned
    pub adjourned: usize,

    /// Cumulative disposals since run start
    pub disposals: usize,

    /// heard / total effective capacity for the day (0.0 when capacity is 0)
    pub utilization: f64,
}

impl DailyMetrics {
    /// Compute the day's utilization fraction.
    ///
    /// Zero-capacity days (holidays, deliberately starved scenarios) yield
    /// 0.0 rather than a division error.
    pub fn utilization_for(heard: usize, total_capacity: u32) -> f64 {
        if total_capacity == 0 {
            0.0
        } else {
            heard as f64 / total_capacity as f64
        }
    }
}

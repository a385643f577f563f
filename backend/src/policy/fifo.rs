//! FIFO (First-In-First-Out) Policy
//!
//! Simplest baseline policy: oldest filed case first.
//!
//! # Behavior
//!
//! - Stable sort by filed date ascending
//! - Ties keep input order (stable sort, required for determinism)
//! - No readiness-score precomputation needed

use super::SchedulingPolicy;
use crate::models::Case;
use chrono::NaiveDate;

/// FIFO policy: list oldest filed cases first
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use court_simulator_core_rs::policy::{FifoPolicy, SchedulingPolicy};
/// use court_simulator_core_rs::Case;
///
/// let older = Case::new("OS-000001".into(), "OS".into(),
///     NaiveDate::from_ymd_opt(2022, 1, 3).unwrap(), "evidence".into());
/// let newer = Case::new("OS-000002".into(), "OS".into(),
///     NaiveDate::from_ymd_opt(2023, 1, 3).unwrap(), "evidence".into());
///
/// let today = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
/// let ordered = FifoPolicy.prioritize(vec![&newer, &older], today);
/// assert_eq!(ordered[0].id(), "OS-000001");
/// ```
pub struct FifoPolicy;

impl SchedulingPolicy for FifoPolicy {
    fn name(&self) -> &'static str {
        "fifo"
    }

    fn prioritize<'a>(&self, mut cases: Vec<&'a Case>, _today: NaiveDate) -> Vec<&'a Case> {
        // sort_by is stable: equal filed dates keep input order
        cases.sort_by(|a, b| a.filed_date().cmp(&b.filed_date()));
        cases
    }
}

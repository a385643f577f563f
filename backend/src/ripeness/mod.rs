//! Ripeness classification
//!
//! Whether a case has cleared its procedural prerequisites (service of
//! summons, stay resolution, initial scrutiny) and is substantively ready
//! for a hearing on the merits. The rules are stage/flag heuristics
//! distilled from historical hearing-purpose text.
//!
//! `classify` is a pure function: it never mutates the case. The engine
//! persists status changes and emits `ripeness_change` events by comparing
//! canonical string values, so two statuses compare equal exactly when
//! their `as_str()` values match.
//!
//! Unknown or missing data classifies as `ConditionallyRipe`, which counts
//! as ripe for scheduling. This conservative default is load-bearing for
//! throughput: a classifier that parked unrecognized cases would starve
//! the courtrooms.

use crate::models::Case;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Minimum age (days) before a freshly filed case is ripe for its first
/// listing; registry scrutiny takes at least this long.
pub const MIN_FIRST_LISTING_AGE_DAYS: i64 = 14;

/// Stages during which incomplete service of summons blocks a merits
/// hearing.
const SERVICE_GATED_STAGES: &[&str] = &["admission", "service"];

/// The stage set the classifier has heuristics for. A stage outside this
/// set falls through to the conservative default.
const KNOWN_STAGES: &[&str] = &[
    "admission",
    "service",
    "pleadings",
    "framing",
    "evidence",
    "arguments",
    "judgment",
];

/// Ripeness status of a case on a given date
///
/// `Ripe` and `ConditionallyRipe` both proceed to scheduling; the
/// remaining variants are filtered out with a reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RipenessStatus {
    /// Cleared all procedural prerequisites
    Ripe,

    /// Unknown/missing data; treated as ripe (conservative default)
    ConditionallyRipe,

    /// Service of summons/notice not yet complete
    ServicePending,

    /// An active stay blocks proceedings
    Stayed,

    /// Early procedural step (registry scrutiny) not yet done
    AwaitingProcedure,
}

impl RipenessStatus {
    /// Canonical string value; the engine compares these to detect
    /// transitions.
    pub fn as_str(&self) -> &'static str {
        match self {
            RipenessStatus::Ripe => "ripe",
            RipenessStatus::ConditionallyRipe => "conditionally_ripe",
            RipenessStatus::ServicePending => "unripe_service_pending",
            RipenessStatus::Stayed => "unripe_stay",
            RipenessStatus::AwaitingProcedure => "unripe_procedural",
        }
    }

    /// Whether a case with this status proceeds to scheduling.
    pub fn is_ripe(&self) -> bool {
        matches!(self, RipenessStatus::Ripe | RipenessStatus::ConditionallyRipe)
    }
}

impl std::fmt::Display for RipenessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a case's ripeness as of `today`.
///
/// Deterministic and side-effect-free. Rule order matters: a stay
/// dominates everything, then service, then registry scrutiny for fresh
/// filings.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use court_simulator_core_rs::ripeness::{classify, RipenessStatus};
/// use court_simulator_core_rs::Case;
///
/// let filed = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let case = Case::new("OS-000001".into(), "OS".into(), filed, "evidence".into())
///     .with_service_complete(true);
///
/// let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
/// assert_eq!(classify(&case, today), RipenessStatus::Ripe);
/// ```
pub fn classify(case: &Case, today: NaiveDate) -> RipenessStatus {
    if case.has_active_stay() {
        return RipenessStatus::Stayed;
    }

    let stage = case.current_stage();

    if !case.is_service_complete() && SERVICE_GATED_STAGES.contains(&stage) {
        return RipenessStatus::ServicePending;
    }

    if stage == "admission"
        && case.hearing_count() == 0
        && case.age_days(today) < MIN_FIRST_LISTING_AGE_DAYS
    {
        return RipenessStatus::AwaitingProcedure;
    }

    if KNOWN_STAGES.contains(&stage) {
        RipenessStatus::Ripe
    } else {
        // Conservative default for stages we have no heuristics for.
        RipenessStatus::ConditionallyRipe
    }
}

/// Human-readable reason for a non-ripe status, used in event details.
///
/// Returns `None` for statuses that proceed to scheduling.
pub fn ripeness_reason(status: RipenessStatus) -> Option<&'static str> {
    match status {
        RipenessStatus::Ripe | RipenessStatus::ConditionallyRipe => None,
        RipenessStatus::ServicePending => Some("service of summons pending"),
        RipenessStatus::Stayed => Some("proceedings stayed"),
        RipenessStatus::AwaitingProcedure => Some("awaiting registry scrutiny"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn case_in_stage(stage: &str) -> Case {
        Case::new(
            "OS-000001".to_string(),
            "OS".to_string(),
            date(2023, 1, 2),
            stage.to_string(),
        )
        .with_service_complete(true)
    }

    #[test]
    fn test_stay_dominates() {
        let case = case_in_stage("arguments").with_stay(true);
        assert_eq!(classify(&case, date(2024, 1, 1)), RipenessStatus::Stayed);
    }

    #[test]
    fn test_service_pending_in_early_stages() {
        let case = case_in_stage("service").with_service_complete(false);
        assert_eq!(
            classify(&case, date(2024, 1, 1)),
            RipenessStatus::ServicePending
        );

        // Service is only gating in early stages
        let late = case_in_stage("evidence").with_service_complete(false);
        assert_eq!(classify(&late, date(2024, 1, 1)), RipenessStatus::Ripe);
    }

    #[test]
    fn test_fresh_filing_awaits_scrutiny() {
        let filed = date(2024, 1, 2);
        let case = Case::new(
            "OS-000002".to_string(),
            "OS".to_string(),
            filed,
            "admission".to_string(),
        )
        .with_service_complete(true);

        assert_eq!(
            classify(&case, date(2024, 1, 10)),
            RipenessStatus::AwaitingProcedure
        );
        assert_eq!(
            classify(&case, date(2024, 1, 16)),
            RipenessStatus::Ripe,
        );
    }

    #[test]
    fn test_unknown_stage_is_conditionally_ripe() {
        let case = case_in_stage("remand");
        let status = classify(&case, date(2024, 1, 1));

        assert_eq!(status, RipenessStatus::ConditionallyRipe);
        // The conservative default must count as ripe.
        assert!(status.is_ripe());
    }

    #[test]
    fn test_reason_strings() {
        assert_eq!(ripeness_reason(RipenessStatus::Ripe), None);
        assert_eq!(ripeness_reason(RipenessStatus::ConditionallyRipe), None);
        assert!(ripeness_reason(RipenessStatus::Stayed).is_some());
        assert!(ripeness_reason(RipenessStatus::ServicePending).is_some());
        assert!(ripeness_reason(RipenessStatus::AwaitingProcedure).is_some());
    }

    #[test]
    fn test_classify_is_pure() {
        let case = case_in_stage("framing");
        let today = date(2024, 1, 1);

        let first = classify(&case, today);
        let second = classify(&case, today);
        assert_eq!(first.as_str(), second.as_str());
    }
}

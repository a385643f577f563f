//! Readiness-based Policy
//!
//! Lists cases by descending composite readiness score: a weighted
//! function of age, urgency, stage, and hearing recency, with an
//! exponential boost for recently adjourned cases (see
//! `Case::compute_readiness_score`).
//!
//! The score must already be computed when this policy runs; the engine
//! recomputes it for every candidate on days this policy is active
//! (`requires_readiness_scores` returns true) and skips that work for
//! fifo/age.

use super::SchedulingPolicy;
use crate::models::Case;
use chrono::NaiveDate;
use std::cmp::Ordering;

/// Readiness policy: highest precomputed readiness score first
pub struct ReadinessPolicy;

impl SchedulingPolicy for ReadinessPolicy {
    fn name(&self) -> &'static str {
        "readiness"
    }

    fn requires_readiness_scores(&self) -> bool {
        true
    }

    fn prioritize<'a>(&self, mut cases: Vec<&'a Case>, _today: NaiveDate) -> Vec<&'a Case> {
        // Descending score; stable, NaN-free because scores are finite
        // sums of bounded components
        cases.sort_by(|a, b| {
            b.readiness_score()
                .partial_cmp(&a.readiness_score())
                .unwrap_or(Ordering::Equal)
        });
        cases
    }
}

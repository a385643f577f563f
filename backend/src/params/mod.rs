//! Parameter store — empirically derived simulation parameters
//!
//! The estimation pipeline that fits these tables from historical hearing
//! records is an external collaborator; the engine only consumes the
//! read-only query interface defined here. `EmpiricalParameterStore` is an
//! in-memory table implementation with a plausible default table for the
//! standard stage set, so the simulator runs stand-alone and tests can
//! pin exact probabilities.
//!
//! Stage-transition tables are stored in cumulative form: an ordered
//! sequence of `(next_stage, cumulative_probability)` walked with a single
//! uniform draw.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// The standard procedural stage set, in nominal order. Transition tables
/// make the actual flow ordered-but-not-strictly-linear.
pub const DEFAULT_STAGES: &[&str] = &[
    "admission",
    "service",
    "pleadings",
    "framing",
    "evidence",
    "arguments",
    "judgment",
];

/// Duration assumed for stages missing from the table (days).
pub const DEFAULT_STAGE_DURATION_DAYS: f64 = 60.0;

/// P90/median ratio assumed when only a median is configured.
pub const DEFAULT_P90_RATIO: f64 = 2.2;

/// Adjournment probability assumed for stages missing from the table.
pub const DEFAULT_ADJOURNMENT_PROB: f64 = 0.35;

/// Errors from parameter lookups
#[derive(Debug, Error, PartialEq)]
pub enum ParameterError {
    #[error("Unknown case type: {case_type}")]
    UnknownCaseType { case_type: String },

    #[error("Unknown duration percentile: {value} (expected 'median' or 'p90')")]
    UnknownPercentile { value: String },
}

/// Which fitted duration percentile the engine uses for stage gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationPercentile {
    Median,
    P90,
}

impl FromStr for DurationPercentile {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "median" => Ok(DurationPercentile::Median),
            "p90" => Ok(DurationPercentile::P90),
            other => Err(ParameterError::UnknownPercentile {
                value: other.to_string(),
            }),
        }
    }
}

/// Historical medians for one case type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaseTypeStats {
    /// Median days from filing to disposal
    pub disposal_median_days: f64,

    /// Median number of hearings to disposal
    pub hearings_median: f64,
}

/// Read-only lookup of empirically derived stage durations, adjournment
/// probabilities, and stage-transition distributions.
pub trait ParameterStore {
    /// Typical duration of a stage in days at the given percentile.
    fn stage_duration(&self, stage: &str, percentile: DurationPercentile) -> f64;

    /// Probability that a hearing in `stage` for `case_type` is adjourned.
    fn adjournment_prob(&self, stage: &str, case_type: &str) -> f64;

    /// Ordered cumulative transition table out of `stage`. Empty when the
    /// stage has no outgoing transitions (absorbing).
    fn stage_transitions(&self, stage: &str) -> &[(String, f64)];

    /// Historical medians for a case type.
    ///
    /// # Errors
    /// `ParameterError::UnknownCaseType` for types absent from the fitted
    /// table; callers recover with documented fallback constants.
    fn case_type_stats(&self, case_type: &str) -> Result<CaseTypeStats, ParameterError>;

    /// Marginal probability of a single transition `from_stage` →
    /// `to_stage` (differenced from the cumulative table).
    fn transition_prob(&self, from_stage: &str, to_stage: &str) -> f64;
}

/// In-memory parameter tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmpiricalParameterStore {
    /// stage → (median days, p90 days)
    durations: HashMap<String, (f64, f64)>,

    /// stage → base adjournment probability
    stage_adjournment: HashMap<String, f64>,

    /// (stage, case type) → adjournment probability override
    adjournment_overrides: HashMap<(String, String), f64>,

    /// stage → cumulative transition table
    transitions: HashMap<String, Vec<(String, f64)>>,

    /// case type → historical medians
    case_type_stats: HashMap<String, CaseTypeStats>,
}

impl EmpiricalParameterStore {
    /// Create an empty store; every lookup answers with module defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store fitted to a plausible default table over `DEFAULT_STAGES` and
    /// the common case types (RSA, CCC, OS, CRP).
    pub fn with_defaults() -> Self {
        let mut store = Self::new();

        store.set_stage_duration("admission", 45.0, 100.0);
        store.set_stage_duration("service", 60.0, 140.0);
        store.set_stage_duration("pleadings", 75.0, 170.0);
        store.set_stage_duration("framing", 50.0, 110.0);
        store.set_stage_duration("evidence", 120.0, 270.0);
        store.set_stage_duration("arguments", 90.0, 200.0);
        store.set_stage_duration("judgment", 30.0, 70.0);

        store.set_stage_adjournment_prob("admission", 0.25);
        store.set_stage_adjournment_prob("service", 0.45);
        store.set_stage_adjournment_prob("pleadings", 0.40);
        store.set_stage_adjournment_prob("framing", 0.35);
        store.set_stage_adjournment_prob("evidence", 0.50);
        store.set_stage_adjournment_prob("arguments", 0.30);
        store.set_stage_adjournment_prob("judgment", 0.20);

        store.set_stage_transitions(
            "admission",
            vec![
                ("service".to_string(), 0.70),
                ("pleadings".to_string(), 0.90),
                ("framing".to_string(), 1.00),
            ],
        );
        store.set_stage_transitions(
            "service",
            vec![
                ("pleadings".to_string(), 0.80),
                ("framing".to_string(), 1.00),
            ],
        );
        store.set_stage_transitions(
            "pleadings",
            vec![
                ("framing".to_string(), 0.85),
                ("evidence".to_string(), 1.00),
            ],
        );
        store.set_stage_transitions(
            "framing",
            vec![
                ("evidence".to_string(), 0.90),
                ("arguments".to_string(), 1.00),
            ],
        );
        store.set_stage_transitions(
            "evidence",
            vec![
                ("arguments".to_string(), 0.85),
                ("judgment".to_string(), 1.00),
            ],
        );
        store.set_stage_transitions("arguments", vec![("judgment".to_string(), 1.00)]);

        store.set_case_type_stats(
            "RSA",
            CaseTypeStats {
                disposal_median_days: 1095.0,
                hearings_median: 12.0,
            },
        );
        store.set_case_type_stats(
            "CCC",
            CaseTypeStats {
                disposal_median_days: 365.0,
                hearings_median: 6.0,
            },
        );
        store.set_case_type_stats(
            "OS",
            CaseTypeStats {
                disposal_median_days: 730.0,
                hearings_median: 10.0,
            },
        );
        store.set_case_type_stats(
            "CRP",
            CaseTypeStats {
                disposal_median_days: 540.0,
                hearings_median: 8.0,
            },
        );

        store
    }

    /// Set a stage's (median, p90) duration in days.
    pub fn set_stage_duration(&mut self, stage: &str, median: f64, p90: f64) {
        assert!(median > 0.0 && p90 >= median, "durations must be positive and p90 >= median");
        self.durations.insert(stage.to_string(), (median, p90));
    }

    /// Set a stage's base adjournment probability.
    pub fn set_stage_adjournment_prob(&mut self, stage: &str, prob: f64) {
        assert!((0.0..=1.0).contains(&prob), "probability must be in [0, 1]");
        self.stage_adjournment.insert(stage.to_string(), prob);
    }

    /// Override the adjournment probability for one (stage, case type).
    pub fn set_adjournment_override(&mut self, stage: &str, case_type: &str, prob: f64) {
        assert!((0.0..=1.0).contains(&prob), "probability must be in [0, 1]");
        self.adjournment_overrides
            .insert((stage.to_string(), case_type.to_string()), prob);
    }

    /// Set a stage's cumulative transition table.
    ///
    /// # Panics
    /// Panics if cumulative probabilities are not non-decreasing in (0, 1].
    pub fn set_stage_transitions(&mut self, stage: &str, table: Vec<(String, f64)>) {
        let mut prev = 0.0;
        for (next_stage, cum) in &table {
            assert!(
                *cum > prev && *cum <= 1.0 + 1e-9,
                "cumulative probability for {} -> {} must be increasing in (0, 1]",
                stage,
                next_stage
            );
            prev = *cum;
        }
        self.transitions.insert(stage.to_string(), table);
    }

    /// Set historical medians for a case type.
    pub fn set_case_type_stats(&mut self, case_type: &str, stats: CaseTypeStats) {
        self.case_type_stats.insert(case_type.to_string(), stats);
    }
}

impl ParameterStore for EmpiricalParameterStore {
    fn stage_duration(&self, stage: &str, percentile: DurationPercentile) -> f64 {
        match self.durations.get(stage) {
            Some((median, p90)) => match percentile {
                DurationPercentile::Median => *median,
                DurationPercentile::P90 => *p90,
            },
            None => match percentile {
                DurationPercentile::Median => DEFAULT_STAGE_DURATION_DAYS,
                DurationPercentile::P90 => DEFAULT_STAGE_DURATION_DAYS * DEFAULT_P90_RATIO,
            },
        }
    }

    fn adjournment_prob(&self, stage: &str, case_type: &str) -> f64 {
        if let Some(p) = self
            .adjournment_overrides
            .get(&(stage.to_string(), case_type.to_string()))
        {
            return *p;
        }
        self.stage_adjournment
            .get(stage)
            .copied()
            .unwrap_or(DEFAULT_ADJOURNMENT_PROB)
    }

    fn stage_transitions(&self, stage: &str) -> &[(String, f64)] {
        self.transitions
            .get(stage)
            .map(|table| table.as_slice())
            .unwrap_or(&[])
    }

    fn case_type_stats(&self, case_type: &str) -> Result<CaseTypeStats, ParameterError> {
        self.case_type_stats
            .get(case_type)
            .copied()
            .ok_or_else(|| ParameterError::UnknownCaseType {
                case_type: case_type.to_string(),
            })
    }

    fn transition_prob(&self, from_stage: &str, to_stage: &str) -> f64 {
        let mut prev = 0.0;
        for (next_stage, cum) in self.stage_transitions(from_stage) {
            if next_stage == to_stage {
                return cum - prev;
            }
            prev = *cum;
        }
        0.0
    }
}

//! Caseload generation
//!
//! Deterministic synthetic caseload creation: an initial pool sampled as
//! of the run's start date, plus optional Poisson-sampled mid-run filings.
//! All draws come from the run's shared `SimRng`, so generation is fully
//! reproducible from the seed.
//!
//! # Key Principles
//!
//! 1. **Determinism**: same seed + same config → same caseload
//! 2. **Sequential ids**: `{TYPE}-{:06}` from one counter; UUIDs would
//!    break replay identity
//! 3. **Weighted composition**: case type and stage mix are configured as
//!    weights, matching the shape of a historical docket

use crate::models::Case;
use crate::rng::SimRng;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Configuration for synthetic caseload generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Case type mix (type → weight)
    pub case_type_weights: Vec<(String, f64)>,

    /// Stage mix for the initial pool (stage → weight)
    pub stage_weights: Vec<(String, f64)>,

    /// Filing dates for the initial pool are drawn uniformly within this
    /// many days before the as-of date
    pub lookback_days: i64,

    /// Probability a generated case is flagged urgent
    pub urgent_rate: f64,

    /// Probability service of summons is already complete
    pub service_complete_rate: f64,

    /// Probability an active stay blocks the case
    pub stay_rate: f64,

    /// Hearing history for cases generated past admission: count drawn in
    /// [1, max_seed_hearings], last hearing within the past 120 days
    pub max_seed_hearings: i64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            case_type_weights: vec![
                ("OS".to_string(), 0.40),
                ("RSA".to_string(), 0.30),
                ("CRP".to_string(), 0.15),
                ("CCC".to_string(), 0.15),
            ],
            stage_weights: vec![
                ("admission".to_string(), 0.25),
                ("service".to_string(), 0.15),
                ("pleadings".to_string(), 0.15),
                ("framing".to_string(), 0.15),
                ("evidence".to_string(), 0.20),
                ("arguments".to_string(), 0.10),
            ],
            lookback_days: 4 * 365,
            urgent_rate: 0.08,
            service_complete_rate: 0.70,
            stay_rate: 0.05,
            max_seed_hearings: 10,
        }
    }
}

/// Generator for synthetic cases.
///
/// Keeps a single id counter across the pool and any mid-run filings so
/// ids never collide within a run.
#[derive(Debug, Clone)]
pub struct CaseGenerator {
    config: GeneratorConfig,

    /// Next case id counter
    next_case_id: usize,
}

impl CaseGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            next_case_id: 1,
        }
    }

    /// Generate the initial case pool as of `as_of`.
    pub fn generate_pool(&mut self, count: usize, as_of: NaiveDate, rng: &mut SimRng) -> Vec<Case> {
        (0..count).map(|_| self.generate_backlog_case(as_of, rng)).collect()
    }

    /// Generate mid-run filings for one day: a Poisson-sampled count of
    /// fresh cases filed on `date`, entering at the admission stage.
    pub fn generate_filings(
        &mut self,
        rate_per_day: f64,
        date: NaiveDate,
        rng: &mut SimRng,
    ) -> Vec<Case> {
        let count = rng.poisson(rate_per_day);
        (0..count)
            .map(|_| {
                let case_type = pick_weighted(&self.config.case_type_weights, rng);
                self.new_case(case_type, date, "admission".to_string(), rng)
            })
            .collect()
    }

    /// One backlog case: filed within the lookback window, placed at a
    /// weighted stage, with hearing history consistent with that stage.
    fn generate_backlog_case(&mut self, as_of: NaiveDate, rng: &mut SimRng) -> Case {
        let case_type = pick_weighted(&self.config.case_type_weights, rng);
        let stage = pick_weighted(&self.config.stage_weights, rng);

        let age = rng.range(0, self.config.lookback_days.max(1));
        let filed = as_of - Duration::days(age);

        let mut case = self.new_case(case_type, filed, stage.clone(), rng);

        // Cases past admission have been heard before; the last hearing
        // can be no earlier than the filing date
        if stage != "admission" {
            let hearings = rng.range(1, self.config.max_seed_hearings + 1) as u32;
            let days_back = rng.range(7, 121).min(age);
            let last_hearing = as_of - Duration::days(days_back);
            case = case.with_hearing_history(hearings, last_hearing);
        }

        case
    }

    fn new_case(
        &mut self,
        case_type: String,
        filed: NaiveDate,
        stage: String,
        rng: &mut SimRng,
    ) -> Case {
        let id = format!("{}-{:06}", case_type, self.next_case_id);
        self.next_case_id += 1;

        Case::new(id, case_type, filed, stage)
            .with_urgent(rng.bernoulli(self.config.urgent_rate))
            .with_service_complete(rng.bernoulli(self.config.service_complete_rate))
            .with_stay(rng.bernoulli(self.config.stay_rate))
    }
}

/// Weighted selection over (value, weight) pairs.
///
/// Falls back to the last entry on accumulated floating-point slack.
///
/// # Panics
/// Panics if `weights` is empty or the total weight is not positive.
fn pick_weighted(weights: &[(String, f64)], rng: &mut SimRng) -> String {
    assert!(!weights.is_empty(), "weight table must not be empty");
    let total: f64 = weights.iter().map(|(_, w)| w).sum();
    assert!(total > 0.0, "total weight must be positive");

    let mut target = rng.next_f64() * total;
    for (value, weight) in weights {
        target -= weight;
        if target <= 0.0 {
            return value.clone();
        }
    }
    weights[weights.len() - 1].0.clone()
}

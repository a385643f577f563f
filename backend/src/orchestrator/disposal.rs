//! Natural-disposal heuristic
//!
//! A probabilistic check applied only when a case is heard while in a
//! disposal-capable stage. The disposal likelihood is the product of
//! three independent factors — age maturity, hearing-count maturity, and
//! a stage multiplier — capped at an overall maximum so a single day can
//! never mass-dispose the pool.
//!
//! All breakpoints and rates are named constants: they are calibration
//! detail and must be tunable without touching the algorithm.

use crate::models::Case;
use crate::params::ParameterStore;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maturity ratio below which disposal probability stays at the floor.
pub const MATURITY_RAMP_START: f64 = 0.2;

/// Maturity ratio where the ramp steepens.
pub const MATURITY_RAMP_KNEE: f64 = 0.8;

/// Maturity ratio beyond which the age factor is capped.
pub const MATURITY_CAP: f64 = 1.5;

/// Age factor for immature cases (maturity < `MATURITY_RAMP_START`).
pub const AGE_PROB_FLOOR: f64 = 0.02;

/// Age factor at the knee (`MATURITY_RAMP_KNEE`).
pub const AGE_PROB_AT_KNEE: f64 = 0.10;

/// Age factor at and beyond `MATURITY_CAP`.
pub const AGE_PROB_CEILING: f64 = 0.30;

/// Cap on hearing_count / median_hearings.
pub const HEARING_FACTOR_CAP: f64 = 1.5;

/// Overall cap on the combined disposal probability.
pub const MAX_DISPOSAL_PROB: f64 = 0.30;

/// Median days to disposal assumed for unknown case types.
pub const FALLBACK_MEDIAN_DISPOSAL_DAYS: f64 = 730.0;

/// Median hearings to disposal assumed for unknown case types.
pub const FALLBACK_MEDIAN_HEARINGS: f64 = 8.0;

/// Disposal-capable stages and their multipliers.
///
/// The multiplier is lower in stages where early disposal is possible but
/// uncommon (settlement at framing) and higher in stages that are nearly
/// always terminal (arguments). A stage absent from the map cannot
/// dispose naturally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisposalModel {
    stage_factors: BTreeMap<String, f64>,
}

impl Default for DisposalModel {
    fn default() -> Self {
        let mut stage_factors = BTreeMap::new();
        stage_factors.insert("framing".to_string(), 0.3);
        stage_factors.insert("evidence".to_string(), 0.6);
        stage_factors.insert("arguments".to_string(), 1.0);
        Self { stage_factors }
    }
}

impl DisposalModel {
    /// Model with a custom disposal-capable stage set.
    pub fn new(stage_factors: BTreeMap<String, f64>) -> Self {
        Self { stage_factors }
    }

    /// Whether a heard hearing in this stage can dispose the case.
    pub fn is_disposal_capable(&self, stage: &str) -> bool {
        self.stage_factors.contains_key(stage)
    }

    /// Disposal probability for a case heard today.
    ///
    /// Returns 0.0 outside disposal-capable stages. Unknown case types
    /// fall back to `FALLBACK_MEDIAN_DISPOSAL_DAYS` /
    /// `FALLBACK_MEDIAN_HEARINGS`; the lookup error never propagates.
    pub fn disposal_probability(
        &self,
        case: &Case,
        today: NaiveDate,
        params: &dyn ParameterStore,
    ) -> f64 {
        let stage_factor = match self.stage_factors.get(case.current_stage()) {
            Some(f) => *f,
            None => return 0.0,
        };

        let (median_days, median_hearings) = match params.case_type_stats(case.case_type()) {
            Ok(stats) => (stats.disposal_median_days, stats.hearings_median),
            Err(_) => (FALLBACK_MEDIAN_DISPOSAL_DAYS, FALLBACK_MEDIAN_HEARINGS),
        };

        let maturity = case.age_days(today).max(0) as f64 / median_days;
        let hearing_factor =
            (case.hearing_count() as f64 / median_hearings).min(HEARING_FACTOR_CAP);

        (age_factor(maturity) * hearing_factor * stage_factor).min(MAX_DISPOSAL_PROB)
    }
}

/// Piecewise age factor over the maturity ratio (age / median disposal
/// duration): flat floor, shallow ramp, steeper ramp, capped ceiling.
pub fn age_factor(maturity: f64) -> f64 {
    if maturity < MATURITY_RAMP_START {
        AGE_PROB_FLOOR
    } else if maturity < MATURITY_RAMP_KNEE {
        let t = (maturity - MATURITY_RAMP_START) / (MATURITY_RAMP_KNEE - MATURITY_RAMP_START);
        AGE_PROB_FLOOR + t * (AGE_PROB_AT_KNEE - AGE_PROB_FLOOR)
    } else if maturity < MATURITY_CAP {
        let t = (maturity - MATURITY_RAMP_KNEE) / (MATURITY_CAP - MATURITY_RAMP_KNEE);
        AGE_PROB_AT_KNEE + t * (AGE_PROB_CEILING - AGE_PROB_AT_KNEE)
    } else {
        AGE_PROB_CEILING
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::EmpiricalParameterStore;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn case_aged(case_type: &str, stage: &str, age_days: i64, hearings: u32) -> (Case, NaiveDate) {
        let today = date(2024, 6, 3);
        let filed = today - Duration::days(age_days);
        let mut case = Case::new(
            format!("{}-000001", case_type),
            case_type.to_string(),
            filed,
            stage.to_string(),
        );
        if hearings > 0 {
            case = case.with_hearing_history(hearings, today - Duration::days(30));
        }
        (case, today)
    }

    #[test]
    fn test_age_factor_piecewise() {
        assert_eq!(age_factor(0.0), AGE_PROB_FLOOR);
        assert_eq!(age_factor(0.19), AGE_PROB_FLOOR);
        assert!((age_factor(0.5) - 0.06).abs() < 1e-12);
        assert!((age_factor(MATURITY_RAMP_KNEE) - AGE_PROB_AT_KNEE).abs() < 1e-12);
        assert_eq!(age_factor(1.5), AGE_PROB_CEILING);
        assert_eq!(age_factor(10.0), AGE_PROB_CEILING);
    }

    #[test]
    fn test_ramp_steepens_after_knee() {
        let shallow_slope = (age_factor(0.7) - age_factor(0.6)) / 0.1;
        let steep_slope = (age_factor(1.1) - age_factor(1.0)) / 0.1;
        assert!(steep_slope > shallow_slope);
    }

    #[test]
    fn test_non_capable_stage_never_disposes() {
        let model = DisposalModel::default();
        let params = EmpiricalParameterStore::with_defaults();
        let (case, today) = case_aged("OS", "admission", 2000, 20);

        assert_eq!(model.disposal_probability(&case, today, &params), 0.0);
    }

    #[test]
    fn test_probability_capped() {
        let model = DisposalModel::default();
        let params = EmpiricalParameterStore::with_defaults();
        // Far beyond median age and hearings, in the heaviest stage
        let (case, today) = case_aged("CCC", "arguments", 4000, 40);

        let p = model.disposal_probability(&case, today, &params);
        assert!(p <= MAX_DISPOSAL_PROB);
        assert!((p - MAX_DISPOSAL_PROB).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_case_type_uses_fallback() {
        let model = DisposalModel::default();
        let params = EmpiricalParameterStore::with_defaults();

        // "WP" is not in the fitted table; fallback medians apply
        let (case, today) = case_aged("WP", "evidence", 730, 8);
        let p = model.disposal_probability(&case, today, &params);

        // maturity = 1.0, hearing factor = 1.0, stage factor 0.6
        let expected = (age_factor(1.0) * 1.0 * 0.6).min(MAX_DISPOSAL_PROB);
        assert!((p - expected).abs() < 1e-12);
    }

    #[test]
    fn test_more_hearings_raise_probability_until_cap() {
        let model = DisposalModel::default();
        let params = EmpiricalParameterStore::with_defaults();

        let (few, today) = case_aged("OS", "evidence", 900, 2);
        let (many, _) = case_aged("OS", "evidence", 900, 10);
        let (capped, _) = case_aged("OS", "evidence", 900, 30);

        let p_few = model.disposal_probability(&few, today, &params);
        let p_many = model.disposal_probability(&many, today, &params);
        let p_capped = model.disposal_probability(&capped, today, &params);

        assert!(p_many > p_few);
        // Hearing factor capped at 1.5x median
        let (at_cap, _) = case_aged("OS", "evidence", 900, 15);
        let p_at_cap = model.disposal_probability(&at_cap, today, &params);
        assert_eq!(p_capped, p_at_cap);
    }
}

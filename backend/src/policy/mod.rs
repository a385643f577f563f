//! Scheduling policy module
//!
//! A policy decides the order in which ripe, eligible cases are listed
//! when courtroom capacity cannot accommodate all of them. Policies are
//! pure strategy objects selected by name at configuration time: they
//! carry no mutable state and are polymorphic over a single `prioritize`
//! operation.
//!
//! # Policy Interface
//!
//! All policies implement the `SchedulingPolicy` trait:
//!
//! ```rust
//! use chrono::NaiveDate;
//! use court_simulator_core_rs::policy::SchedulingPolicy;
//! use court_simulator_core_rs::Case;
//!
//! struct MyPolicy;
//!
//! impl SchedulingPolicy for MyPolicy {
//!     fn name(&self) -> &'static str {
//!         "my_policy"
//!     }
//!
//!     fn prioritize<'a>(&self, cases: Vec<&'a Case>, _today: NaiveDate) -> Vec<&'a Case> {
//!         cases // input order
//!     }
//! }
//! ```
//!
//! Available policies:
//! 1. **fifo**: oldest filed first (simple baseline)
//! 2. **age**: oldest case by recomputed age first
//! 3. **readiness**: highest composite readiness score first
//!
//! Policies that sort on the precomputed readiness score declare it via
//! `requires_readiness_scores`, so the engine skips that computation for
//! fifo/age.

use crate::models::Case;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub mod age;
pub mod fifo;
pub mod readiness;

pub use age::AgePolicy;
pub use fifo::FifoPolicy;
pub use readiness::ReadinessPolicy;

/// Errors from policy selection
#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    #[error("Unknown policy: {name} (expected 'fifo', 'age', or 'readiness')")]
    UnknownPolicy { name: String },
}

/// Scheduling policy trait
///
/// `prioritize` receives the day's ripe, eligible cases and returns them
/// in descending priority: position 0 is listed first if capacity allows.
/// Implementations must use stable ordering so equal-priority cases keep
/// their input order (required for determinism).
pub trait SchedulingPolicy: Send + Sync {
    /// Display name (the name the policy is selected by).
    fn name(&self) -> &'static str;

    /// Whether the engine must recompute every candidate's readiness
    /// score before calling `prioritize`.
    fn requires_readiness_scores(&self) -> bool {
        false
    }

    /// Order cases by descending priority.
    fn prioritize<'a>(&self, cases: Vec<&'a Case>, today: NaiveDate) -> Vec<&'a Case>;
}

/// Policy selection, parsed by name at configuration time.
///
/// # Example
/// ```
/// use court_simulator_core_rs::policy::PolicyKind;
///
/// let kind: PolicyKind = "readiness".parse().unwrap();
/// assert_eq!(kind.build().name(), "readiness");
/// assert!("lifo".parse::<PolicyKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    Fifo,
    Age,
    Readiness,
}

impl PolicyKind {
    /// Build the strategy object for this kind.
    pub fn build(&self) -> Box<dyn SchedulingPolicy> {
        match self {
            PolicyKind::Fifo => Box::new(FifoPolicy),
            PolicyKind::Age => Box::new(AgePolicy),
            PolicyKind::Readiness => Box::new(ReadinessPolicy),
        }
    }
}

impl FromStr for PolicyKind {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fifo" => Ok(PolicyKind::Fifo),
            "age" => Ok(PolicyKind::Age),
            "readiness" => Ok(PolicyKind::Readiness),
            other => Err(PolicyError::UnknownPolicy {
                name: other.to_string(),
            }),
        }
    }
}

//! Case model
//!
//! Represents one legal matter moving through the procedural pipeline.
//! Each case has:
//! - Identity (case id, case type such as "RSA" or "CCC")
//! - Temporal fields (filed date, last hearing, last listing, disposal)
//! - Procedural state (current stage, hearing count, status)
//! - Ripeness state (status, unripe reason, date of last change)
//! - A stage-ready date gating when the next stage transition may fire
//!
//! The engine mutates a case at most once per hearing; the terminal
//! transition to `Disposed` is irreversible.

use crate::core::calendar::days_between;
use crate::ripeness::RipenessStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Weight applied to normalized case age in the readiness score.
pub const READINESS_AGE_WEIGHT: f64 = 1.0;

/// Days over which age is normalized for the readiness score.
pub const READINESS_AGE_SCALE_DAYS: f64 = 365.0;

/// Flat bonus for cases flagged urgent.
pub const READINESS_URGENCY_BONUS: f64 = 2.0;

/// Weight applied to the adjournment recency boost.
pub const READINESS_RECENCY_WEIGHT: f64 = 1.5;

/// Decay constant (days) for the recency boost: boost = e^(-days/21).
pub const RECENCY_DECAY_DAYS: f64 = 21.0;

/// Case status
///
/// Tracks where a case sits in its scheduling lifecycle. `Disposed` is
/// terminal: the case is permanently excluded from scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    /// Awaiting listing
    Pending,

    /// Listed for hearing on the last scheduled date
    Scheduled,

    /// Last hearing occurred but was adjourned without progress
    Adjourned,

    /// Terminal: judgment, settlement, or administrative closure
    Disposed,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Pending => "pending",
            CaseStatus::Scheduled => "scheduled",
            CaseStatus::Adjourned => "adjourned",
            CaseStatus::Disposed => "disposed",
        }
    }
}

/// Errors that can occur during case operations
#[derive(Debug, Error, PartialEq)]
pub enum CaseError {
    #[error("Case {id} is already disposed")]
    AlreadyDisposed { id: String },
}

/// Represents one legal case
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use court_simulator_core_rs::Case;
///
/// let filed = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
/// let case = Case::new("RSA-000001".to_string(), "RSA".to_string(), filed, "admission".to_string())
///     .with_urgent(true);
///
/// let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
/// assert_eq!(case.age_days(today), 366); // 2024 is a leap year
/// assert!(!case.is_disposed());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    /// Unique case identifier (e.g., "RSA-000042")
    id: String,

    /// Case type category (e.g., "RSA", "CCC")
    case_type: String,

    /// Date the case was filed
    filed_date: NaiveDate,

    /// Current procedural stage (from the configured stage set)
    current_stage: String,

    /// Scheduling lifecycle status
    status: CaseStatus,

    /// Number of hearings held so far (heard or adjourned)
    hearing_count: u32,

    /// Date of the most recent hearing (heard or adjourned)
    last_hearing_date: Option<NaiveDate>,

    /// Date the case was last listed for hearing
    last_scheduled_date: Option<NaiveDate>,

    /// Date of disposal; set exactly once, together with `Disposed` status
    disposal_date: Option<NaiveDate>,

    /// Urgency flag (feeds the readiness score)
    urgent: bool,

    /// Whether service of summons/notice is complete
    service_complete: bool,

    /// Whether an active stay blocks proceedings
    stay_active: bool,

    /// Composite readiness/priority score; recomputed each candidate pass,
    /// never carried across days
    readiness_score: f64,

    /// Current ripeness status
    ripeness: RipenessStatus,

    /// Reason string for the current non-ripe status, if any
    ripeness_reason: Option<String>,

    /// Date the ripeness status last changed
    ripeness_changed_on: Option<NaiveDate>,

    /// Gate for stage progression: the current stage's typical duration
    /// must elapse (date >= gate) before a heard hearing can advance stage
    stage_ready_date: Option<NaiveDate>,
}

impl Case {
    /// Create a new pending case in the given initial stage.
    ///
    /// Service is assumed incomplete and no stay active; use the builder
    /// methods to override for generated or historical caseloads.
    pub fn new(id: String, case_type: String, filed_date: NaiveDate, initial_stage: String) -> Self {
        Self {
            id,
            case_type,
            filed_date,
            current_stage: initial_stage,
            status: CaseStatus::Pending,
            hearing_count: 0,
            last_hearing_date: None,
            last_scheduled_date: None,
            disposal_date: None,
            urgent: false,
            service_complete: false,
            stay_active: false,
            readiness_score: 0.0,
            ripeness: RipenessStatus::ConditionallyRipe,
            ripeness_reason: None,
            ripeness_changed_on: None,
            stage_ready_date: None,
        }
    }

    /// Set the urgency flag (builder pattern).
    pub fn with_urgent(mut self, urgent: bool) -> Self {
        self.urgent = urgent;
        self
    }

    /// Set the service-complete flag (builder pattern).
    pub fn with_service_complete(mut self, complete: bool) -> Self {
        self.service_complete = complete;
        self
    }

    /// Set the stay flag (builder pattern).
    pub fn with_stay(mut self, stay_active: bool) -> Self {
        self.stay_active = stay_active;
        self
    }

    /// Seed hearing history (builder pattern), for caseloads carried in
    /// from historical records.
    pub fn with_hearing_history(mut self, hearing_count: u32, last_hearing: NaiveDate) -> Self {
        self.hearing_count = hearing_count;
        self.last_hearing_date = Some(last_hearing);
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn case_type(&self) -> &str {
        &self.case_type
    }

    pub fn filed_date(&self) -> NaiveDate {
        self.filed_date
    }

    pub fn current_stage(&self) -> &str {
        &self.current_stage
    }

    pub fn status(&self) -> CaseStatus {
        self.status
    }

    pub fn hearing_count(&self) -> u32 {
        self.hearing_count
    }

    pub fn last_hearing_date(&self) -> Option<NaiveDate> {
        self.last_hearing_date
    }

    pub fn last_scheduled_date(&self) -> Option<NaiveDate> {
        self.last_scheduled_date
    }

    pub fn disposal_date(&self) -> Option<NaiveDate> {
        self.disposal_date
    }

    pub fn is_urgent(&self) -> bool {
        self.urgent
    }

    pub fn is_service_complete(&self) -> bool {
        self.service_complete
    }

    pub fn has_active_stay(&self) -> bool {
        self.stay_active
    }

    pub fn readiness_score(&self) -> f64 {
        self.readiness_score
    }

    pub fn ripeness(&self) -> RipenessStatus {
        self.ripeness
    }

    pub fn ripeness_reason(&self) -> Option<&str> {
        self.ripeness_reason.as_deref()
    }

    pub fn ripeness_changed_on(&self) -> Option<NaiveDate> {
        self.ripeness_changed_on
    }

    pub fn stage_ready_date(&self) -> Option<NaiveDate> {
        self.stage_ready_date
    }

    pub fn is_disposed(&self) -> bool {
        matches!(self.status, CaseStatus::Disposed)
    }

    /// Whether the case was previously adjourned (its most recent hearing
    /// ended without progress).
    pub fn was_adjourned(&self) -> bool {
        matches!(self.status, CaseStatus::Adjourned)
    }

    // ========================================================================
    // Derived values
    // ========================================================================

    /// Age in days relative to the current simulated date.
    ///
    /// Recomputed on demand — never cached across days.
    pub fn age_days(&self, today: NaiveDate) -> i64 {
        days_between(self.filed_date, today)
    }

    /// Calendar days since the most recent hearing, if any.
    pub fn days_since_last_hearing(&self, today: NaiveDate) -> Option<i64> {
        self.last_hearing_date.map(|d| days_between(d, today))
    }

    /// Recency boost applied to previously adjourned cases:
    /// e^(-days_since_last_hearing / 21).
    ///
    /// Returns `None` when the case was not adjourned at its last hearing
    /// or has no hearing history.
    pub fn adjournment_boost(&self, today: NaiveDate) -> Option<f64> {
        if !self.was_adjourned() {
            return None;
        }
        self.days_since_last_hearing(today)
            .map(|days| (-(days as f64) / RECENCY_DECAY_DAYS).exp())
    }

    /// Recompute and store the composite readiness score.
    ///
    /// Weighted combination of normalized age, the urgency flag, a stage
    /// weight, and (for previously adjourned cases) the exponential
    /// recency boost. The readiness policy sorts descending on this value;
    /// the engine recomputes it for every candidate before that policy
    /// runs.
    pub fn compute_readiness_score(&mut self, today: NaiveDate) -> f64 {
        let age_component =
            READINESS_AGE_WEIGHT * (self.age_days(today).max(0) as f64 / READINESS_AGE_SCALE_DAYS);
        let urgency_component = if self.urgent { READINESS_URGENCY_BONUS } else { 0.0 };
        let stage_component = stage_weight(&self.current_stage);
        let recency_component = self
            .adjournment_boost(today)
            .map(|boost| READINESS_RECENCY_WEIGHT * boost)
            .unwrap_or(0.0);

        self.readiness_score =
            age_component + urgency_component + stage_component + recency_component;
        self.readiness_score
    }

    // ========================================================================
    // Mutations (one per hearing)
    // ========================================================================

    /// Mark the case as listed for hearing on `date`.
    pub fn mark_scheduled(&mut self, date: NaiveDate) {
        self.status = CaseStatus::Scheduled;
        self.last_scheduled_date = Some(date);
    }

    /// Record a hearing that was actually heard on `date`.
    ///
    /// The case returns to `Pending` and remains schedulable until a stage
    /// transition or disposal removes it.
    pub fn record_heard(&mut self, date: NaiveDate) {
        self.hearing_count += 1;
        self.last_hearing_date = Some(date);
        self.status = CaseStatus::Pending;
    }

    /// Record a hearing that occurred but was adjourned on `date`.
    pub fn record_adjourned(&mut self, date: NaiveDate) {
        self.hearing_count += 1;
        self.last_hearing_date = Some(date);
        self.status = CaseStatus::Adjourned;
    }

    /// Move the case to a new procedural stage.
    pub fn set_stage(&mut self, stage: String) {
        self.current_stage = stage;
    }

    /// Set the stage-ready gate date.
    pub fn set_stage_ready_date(&mut self, date: NaiveDate) {
        self.stage_ready_date = Some(date);
    }

    /// Update the stored ripeness status.
    ///
    /// The caller (engine) is responsible for comparing canonical values
    /// and emitting a `ripeness_change` event only on an actual change.
    pub fn set_ripeness(
        &mut self,
        status: RipenessStatus,
        reason: Option<String>,
        date: NaiveDate,
    ) {
        self.ripeness = status;
        self.ripeness_reason = reason;
        self.ripeness_changed_on = Some(date);
    }

    /// Dispose the case on `date`. Irreversible.
    ///
    /// # Errors
    /// Returns `CaseError::AlreadyDisposed` if the case was disposed
    /// earlier; the original disposal date is preserved.
    pub fn dispose(&mut self, date: NaiveDate) -> Result<(), CaseError> {
        if self.is_disposed() {
            return Err(CaseError::AlreadyDisposed {
                id: self.id.clone(),
            });
        }
        self.status = CaseStatus::Disposed;
        self.disposal_date = Some(date);
        Ok(())
    }
}

/// Stage weight used in the readiness score: later stages rank higher
/// because the case is closer to resolution. Unknown stages fall back to a
/// neutral weight.
fn stage_weight(stage: &str) -> f64 {
    match stage {
        "admission" => 0.2,
        "service" => 0.3,
        "pleadings" => 0.5,
        "framing" => 0.7,
        "evidence" => 1.0,
        "arguments" => 1.3,
        "judgment" => 1.5,
        _ => 0.5,
    }
}

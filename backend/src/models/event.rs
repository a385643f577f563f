//! Event records for simulation replay and auditing.
//!
//! Every significant state change during a run produces one immutable
//! `EventRecord`. The event log is the audit trail of record: it enables
//! replay-identity checks (same seed → byte-identical log), debugging,
//! and downstream reporting. Records are buffered per day and flushed to
//! the backing store exactly once per simulated day (see `writer`).
//!
//! # Event Types
//!
//! - `filing`: a case entered the pool mid-run
//! - `scheduled`: a case was listed before a courtroom
//! - `outcome`: a listed hearing was heard or adjourned
//! - `stage_change`: a heard hearing advanced the procedural stage
//! - `disposed`: terminal disposal (natural or via terminal stage)
//! - `ripeness_change`: the stored ripeness status changed

use crate::models::Case;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Event type discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Filing,
    Scheduled,
    Outcome,
    StageChange,
    Disposed,
    RipenessChange,
}

impl EventKind {
    /// Canonical value written to the event-log file.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Filing => "filing",
            EventKind::Scheduled => "scheduled",
            EventKind::Outcome => "outcome",
            EventKind::StageChange => "stage_change",
            EventKind::Disposed => "disposed",
            EventKind::RipenessChange => "ripeness_change",
        }
    }
}

/// Optional numeric annotations attached to an event.
///
/// Every column is always present in the log file schema; fields are
/// `None` when not meaningful for the event type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventAnnotations {
    /// Priority score under the active policy at scheduling time
    pub priority_score: Option<f64>,

    /// Case age in days at event time
    pub age_days: Option<i64>,

    /// Composite readiness score, when computed
    pub readiness_score: Option<f64>,

    /// Urgency flag
    pub urgent: Option<bool>,

    /// Recency boost e^(-days/21) for previously adjourned cases
    pub adjournment_boost: Option<f64>,

    /// Canonical ripeness status value
    pub ripeness: Option<String>,

    /// Calendar days since the previous hearing
    pub days_since_last_hearing: Option<i64>,
}

/// One immutable, append-only audit record
///
/// Write-once, read-many; owned by the simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub date: NaiveDate,
    pub kind: EventKind,
    pub case_id: String,
    pub case_type: String,
    pub stage: String,
    pub courtroom_id: Option<String>,
    pub detail: String,
    pub annotations: EventAnnotations,
}

impl EventRecord {
    /// Create a record snapshotting the case's identity and stage.
    pub fn for_case(date: NaiveDate, kind: EventKind, case: &Case) -> Self {
        Self {
            date,
            kind,
            case_id: case.id().to_string(),
            case_type: case.case_type().to_string(),
            stage: case.current_stage().to_string(),
            courtroom_id: None,
            detail: String::new(),
            annotations: EventAnnotations::default(),
        }
    }

    /// Attach the courtroom the event occurred in (builder pattern).
    pub fn in_courtroom(mut self, courtroom_id: &str) -> Self {
        self.courtroom_id = Some(courtroom_id.to_string());
        self
    }

    /// Attach free-text detail (builder pattern).
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    /// Attach numeric annotations (builder pattern).
    pub fn with_annotations(mut self, annotations: EventAnnotations) -> Self {
        self.annotations = annotations;
        self
    }
}

/// In-memory event log with query helpers.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<EventRecord>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Append an event to the log
    pub fn log(&mut self, event: EventRecord) {
        self.events.push(event);
    }

    /// Number of events logged
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// All events in append order
    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Events of a specific kind
    pub fn events_of_kind(&self, kind: EventKind) -> Vec<&EventRecord> {
        self.events.iter().filter(|e| e.kind == kind).collect()
    }

    /// Events for a specific case
    pub fn events_for_case(&self, case_id: &str) -> Vec<&EventRecord> {
        self.events.iter().filter(|e| e.case_id == case_id).collect()
    }

    /// Events on a specific date
    pub fn events_on(&self, date: NaiveDate) -> Vec<&EventRecord> {
        self.events.iter().filter(|e| e.date == date).collect()
    }

    /// SHA-256 fingerprint of the full log.
    ///
    /// Two runs with identical inputs and seed must produce identical
    /// fingerprints; this is the cheap way to assert replay identity
    /// without diffing files.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for event in &self.events {
            // Serialization of a record cannot fail: all field types are
            // plain data.
            let row = serde_json::to_string(event).unwrap_or_default();
            hasher.update(row.as_bytes());
            hasher.update(b"\n");
        }
        format!("{:x}", hasher.finalize())
    }
}

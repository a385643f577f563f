//! Domain models for the court simulation

pub mod case;
pub mod courtroom;
pub mod event;
pub mod metrics;

pub use case::{Case, CaseError, CaseStatus};
pub use courtroom::Courtroom;
pub use event::{EventAnnotations, EventKind, EventLog, EventRecord};
pub use metrics::DailyMetrics;

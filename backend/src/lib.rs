//! Court Simulator Core - Rust Engine
//!
//! Discrete-event simulation of a court system processing a pool of legal
//! cases through procedural stages, for evaluating scheduling policies
//! against fairness, throughput, and utilization.
//!
//! # Architecture
//!
//! - **core**: Working-day calendar and date arithmetic
//! - **models**: Domain types (Case, Courtroom, EventRecord, DailyMetrics)
//! - **params**: Read-only parameter store (stage durations, adjournment
//!   probabilities, transition tables)
//! - **ripeness**: Pure ripeness classification
//! - **policy**: Scheduling policies (fifo / age / readiness)
//! - **allocator**: Load-balanced courtroom allocation
//! - **orchestrator**: Main daily loop and disposal heuristic
//! - **generator**: Deterministic synthetic caseload generation
//! - **writer**: Buffered event-log and metrics sinks (CSV)
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All randomness flows through one seeded RNG (replay identity)
//! 2. Disposal is irreversible; disposed cases never re-enter scheduling
//! 3. The event log is append-only and flushed once per simulated day

// Module declarations
pub mod allocator;
pub mod core;
pub mod generator;
pub mod models;
pub mod orchestrator;
pub mod params;
pub mod policy;
pub mod ripeness;
pub mod rng;
pub mod writer;

// Re-exports for convenience
pub use allocator::{AllocatorStats, CourtroomAllocator, DailyAllocation};
pub use core::calendar::CourtCalendar;
pub use generator::{CaseGenerator, GeneratorConfig};
pub use models::{
    case::{Case, CaseError, CaseStatus},
    courtroom::Courtroom,
    event::{EventAnnotations, EventKind, EventLog, EventRecord},
    metrics::DailyMetrics,
};
pub use orchestrator::{
    CourtSim, DayResult, DisposalModel, SimulationConfig, SimulationError, SimulationResult,
};
pub use params::{
    CaseTypeStats, DurationPercentile, EmpiricalParameterStore, ParameterError, ParameterStore,
};
pub use policy::{PolicyKind, SchedulingPolicy};
pub use ripeness::RipenessStatus;
pub use rng::SimRng;
pub use writer::{
    CsvEventSink, CsvMetricsSink, EventSink, EventWriter, MemoryEventSink, MemoryMetricsSink,
    MetricsSink, WriterError,
};

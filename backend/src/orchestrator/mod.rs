//! Simulation orchestration
//!
//! The daily scheduling loop and the natural-disposal heuristic it
//! applies to heard hearings.

pub mod disposal;
pub mod engine;

pub use disposal::DisposalModel;
pub use engine::{CourtSim, DayResult, SimulationConfig, SimulationError, SimulationResult};

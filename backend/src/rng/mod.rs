//! Deterministic random number generation
//!
//! All stochastic decisions in a simulation run (adjournment draws, stage
//! transitions, disposal checks, caseload generation) share one seeded
//! generator so that identical inputs reproduce identical runs.

pub mod xorshift;

pub use xorshift::SimRng;

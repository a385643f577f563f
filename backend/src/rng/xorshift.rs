//! xorshift64* random number generator
//!
//! Fast, high-quality PRNG suitable for simulation purposes. Every
//! stochastic decision in a run — adjournment outcomes, stage-transition
//! sampling, natural-disposal checks, caseload generation — draws from a
//! single `SimRng` instance seeded once at engine construction.
//!
//! # Determinism
//!
//! Same seed → same sequence of draws. This is CRITICAL for:
//! - Reproducing a run exactly (byte-identical event logs)
//! - Testing (forcing specific hearing outcomes)
//! - Comparing scheduling policies on identical stochastic conditions

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use court_simulator_core_rs::SimRng;
///
/// let mut rng = SimRng::new(12345);
/// let p = rng.next_f64();
/// assert!(p >= 0.0 && p < 1.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimRng {
    /// Internal state (64-bit)
    state: u64,
}

impl SimRng {
    /// Create a new RNG with the given seed.
    ///
    /// A zero seed is mapped to 1 (xorshift requirement: state must never
    /// be zero).
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate the next random u64 value, advancing the internal state.
    pub fn next(&mut self) -> u64 {
        // xorshift64* algorithm
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate a random value in range [min, max).
    ///
    /// # Panics
    /// Panics if min >= max
    pub fn range(&mut self, min: i64, max: i64) -> i64 {
        assert!(min < max, "min must be less than max");

        let value = self.next();
        let range_size = (max - min) as u64;
        min + (value % range_size) as i64
    }

    /// Generate a random f64 in range [0.0, 1.0).
    ///
    /// Used for sampling adjournment outcomes and walking cumulative
    /// stage-transition tables.
    pub fn next_f64(&mut self) -> f64 {
        let value = self.next();
        // Convert to [0.0, 1.0) using the top 53 bits
        (value >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// Draw a Bernoulli outcome with the given success probability.
    ///
    /// Probabilities outside [0, 1] are clamped: p <= 0 never succeeds,
    /// p >= 1 always succeeds. A draw is consumed either way so call sites
    /// stay aligned across runs with different parameter tables.
    ///
    /// # Example
    /// ```
    /// use court_simulator_core_rs::SimRng;
    ///
    /// let mut rng = SimRng::new(7);
    /// assert!(!rng.bernoulli(0.0));
    /// assert!(rng.bernoulli(1.0));
    /// ```
    pub fn bernoulli(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Sample a Poisson-distributed count with mean `lambda`.
    ///
    /// Knuth's multiplication method; adequate for the small rates used in
    /// daily filing generation.
    pub fn poisson(&mut self, lambda: f64) -> u64 {
        if lambda <= 0.0 {
            return 0;
        }

        let l = (-lambda).exp();
        let mut k: u64 = 0;
        let mut p = 1.0;

        loop {
            p *= self.next_f64();
            if p <= l {
                return k;
            }
            k += 1;
        }
    }

    /// Get current RNG state (for replay verification).
    pub fn get_state(&self) -> u64 {
        self.state
    }
}

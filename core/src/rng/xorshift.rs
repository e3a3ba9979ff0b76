//! xorshift64* random number generator
//!
//! A fast, high-quality PRNG that is deterministic and suitable for
//! simulation purposes.
//!
//! # Determinism
//!
//! Same seed → same sequence of random numbers. This matters for:
//! - Debugging (reproduce an exact run)
//! - Testing (assert exact arrival counts)
//! - Checkpointing (resume mid-run with identical results)

use serde::{Deserialize, Serialize};

/// Maximum number of uniform draws per Poisson sample. Bounds the
/// multiplicative algorithm for pathological means.
const POISSON_DRAW_CAP: u32 = 50;

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use intersection_core::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let value = rng.next();
/// let arrivals = rng.poisson(0.6);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    /// Internal state (64-bit)
    state: u64,
}

impl RngManager {
    /// Create a new RNG with the given seed.
    ///
    /// A zero seed is mapped to 1 (xorshift requires non-zero state).
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate the next random u64 value, advancing the internal state.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> u64 {
        // xorshift64* algorithm
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate a random f64 in range [0.0, 1.0).
    ///
    /// # Example
    /// ```
    /// use intersection_core::RngManager;
    ///
    /// let mut rng = RngManager::new(12345);
    /// let u = rng.next_f64();
    /// assert!(u >= 0.0 && u < 1.0);
    /// ```
    pub fn next_f64(&mut self) -> f64 {
        let value = self.next();
        // Use the top 53 bits for a uniform double in [0, 1)
        (value >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// Sample a Poisson-distributed count with the given mean.
    ///
    /// Uses the multiplicative algorithm: multiply uniform draws into a
    /// running product until it falls below `e^(-mean)`; the count is the
    /// number of multiplications minus one. The draw loop is capped at 50
    /// iterations so pathological means always terminate.
    ///
    /// A mean of zero or less deterministically yields 0 without consuming
    /// randomness.
    ///
    /// # Example
    /// ```
    /// use intersection_core::RngManager;
    ///
    /// let mut rng = RngManager::new(42);
    /// assert_eq!(rng.poisson(0.0), 0);
    /// assert_eq!(rng.poisson(-1.0), 0);
    /// ```
    pub fn poisson(&mut self, mean: f64) -> u32 {
        if mean <= 0.0 {
            return 0;
        }

        let limit = (-mean).exp();
        let mut product = 1.0;
        let mut count = 0;

        while count < POISSON_DRAW_CAP {
            product *= self.next_f64();
            if product < limit {
                break;
            }
            count += 1;
        }

        count
    }

    /// Get the current RNG state (for checkpointing/replay).
    ///
    /// A generator recreated with `RngManager::new(state)` continues the
    /// exact same sequence.
    pub fn get_state(&self) -> u64 {
        self.state
    }
}

//! Arrival generation for deterministic vehicle creation.
//!
//! Vehicle counts per approach per tick follow a Poisson distribution with
//! mean `arrival_rate × tick_duration`. All generation is deterministic
//! given the RNG seed: same seed + same config → same arrivals, which is
//! what lets tests assert exact queue contents.
//!
//! Vehicle IDs are assigned monotonically per approach (`N0`, `N1`, …,
//! `W0`, …). The generator owns the counters; an ID is consumed even when
//! the controller subsequently drops the vehicle for capacity, so IDs are
//! unique but not necessarily dense in the queue.

use crate::models::direction::{Direction, NUM_APPROACHES};
use crate::models::vehicle::Vehicle;
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};

/// Generator for vehicle arrivals across all four approaches.
///
/// # Example
/// ```
/// use intersection_core::{ArrivalGenerator, Direction, RngManager};
///
/// let mut generator = ArrivalGenerator::new();
/// let mut rng = RngManager::new(42);
///
/// let batch = generator.generate(Direction::North, 0.6, 1.0, 1, &mut rng);
/// for vehicle in &batch {
///     assert_eq!(vehicle.direction(), Direction::North);
///     assert_eq!(vehicle.arrival_tick(), 1);
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrivalGenerator {
    /// Next vehicle sequence number per approach.
    next_ids: [u64; NUM_APPROACHES],
}

impl ArrivalGenerator {
    pub fn new() -> Self {
        Self {
            next_ids: [0; NUM_APPROACHES],
        }
    }

    /// Generate this tick's arrivals for one approach.
    ///
    /// Pure apart from consuming randomness and advancing the ID counters:
    /// the expected batch size is `rate × tick_duration_secs`, and a
    /// non-positive mean deterministically yields an empty batch.
    pub fn generate(
        &mut self,
        direction: Direction,
        rate: f64,
        tick_duration_secs: f64,
        tick: u64,
        rng: &mut RngManager,
    ) -> Vec<Vehicle> {
        let mean = rate * tick_duration_secs;
        let count = rng.poisson(mean);

        (0..count)
            .map(|_| self.next_vehicle(direction, tick))
            .collect()
    }

    /// Mint the next vehicle for an approach, advancing its ID counter.
    pub fn next_vehicle(&mut self, direction: Direction, tick: u64) -> Vehicle {
        let seq = self.next_ids[direction.index()];
        self.next_ids[direction.index()] += 1;

        Vehicle::new(format!("{}{}", direction.short(), seq), direction, tick)
    }

    /// Per-approach ID counters (checkpointing).
    pub fn next_ids(&self) -> [u64; NUM_APPROACHES] {
        self.next_ids
    }

    /// Rebuild a generator mid-run (checkpoint restore).
    pub fn from_checkpoint(next_ids: [u64; NUM_APPROACHES]) -> Self {
        Self { next_ids }
    }
}

impl Default for ArrivalGenerator {
    fn default() -> Self {
        Self::new()
    }
}

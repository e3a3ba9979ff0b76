//! Time management for the simulation
//!
//! The simulation operates in discrete ticks of fixed wall-clock duration.
//! This module provides deterministic time advancement; the cadence at
//! which ticks are driven in real time is the driver's concern, not ours.

use serde::{Deserialize, Serialize};

/// Manages simulation time in discrete ticks
///
/// # Example
/// ```
/// use intersection_core::TickClock;
///
/// let mut clock = TickClock::new(1.0); // 1 second per tick
/// assert_eq!(clock.current_tick(), 0);
///
/// clock.advance();
/// assert_eq!(clock.current_tick(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickClock {
    /// Total ticks elapsed since simulation start
    current_tick: u64,
    /// Simulated duration of one tick, in seconds
    tick_duration_secs: f64,
}

impl TickClock {
    /// Create a new clock.
    ///
    /// The tick duration must have been validated as positive by the
    /// configuration layer before it reaches this constructor.
    pub fn new(tick_duration_secs: f64) -> Self {
        Self {
            current_tick: 0,
            tick_duration_secs,
        }
    }

    /// Advance time by one tick.
    pub fn advance(&mut self) {
        self.current_tick += 1;
    }

    /// Get the current tick (total ticks since start).
    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Get the simulated duration of one tick in seconds.
    pub fn tick_duration_secs(&self) -> f64 {
        self.tick_duration_secs
    }

    /// Change the tick duration. Applied by the controller at tick
    /// boundaries only.
    pub fn set_tick_duration_secs(&mut self, secs: f64) {
        self.tick_duration_secs = secs;
    }

    /// Elapsed simulated time in seconds.
    pub fn elapsed_secs(&self) -> f64 {
        self.current_tick as f64 * self.tick_duration_secs
    }

    /// Rebuild a clock at a given tick (checkpoint restore).
    pub fn from_checkpoint(current_tick: u64, tick_duration_secs: f64) -> Self {
        Self {
            current_tick,
            tick_duration_secs,
        }
    }
}

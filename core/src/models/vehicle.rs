//! Vehicle model
//!
//! A vehicle is one queued unit at an approach. It is created by arrival
//! generation, waits in exactly one approach's FIFO queue, and is moved to
//! that approach's completed history exactly once when served.
//!
//! Timing metrics follow the single-burst model:
//! - waiting    = start − arrival
//! - turnaround = completion − arrival
//! - response   = start − arrival (equal to waiting while service is a
//!   single uninterrupted burst)

use crate::models::direction::Direction;
use serde::{Deserialize, Serialize};

/// Fixed service time: crossing the intersection takes one tick.
pub const BURST_TICKS: u64 = 1;

/// A vehicle waiting at an approach.
///
/// # Example
/// ```
/// use intersection_core::{Direction, Vehicle};
///
/// let v = Vehicle::new("N0".to_string(), Direction::North, 3);
/// assert_eq!(v.arrival_tick(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Identifier, unique and monotonic within the owning approach
    /// (e.g. `N0`, `N1`, `W7`).
    id: String,

    /// Approach this vehicle arrived at.
    direction: Direction,

    /// Tick at which the vehicle joined the queue. Immutable once set.
    arrival_tick: u64,
}

impl Vehicle {
    /// Create a new queued vehicle.
    pub fn new(id: String, direction: Direction, arrival_tick: u64) -> Self {
        Self {
            id,
            direction,
            arrival_tick,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn arrival_tick(&self) -> u64 {
        self.arrival_tick
    }

    /// Consume the vehicle at service time, stamping its start tick and
    /// deriving the completed-vehicle metrics.
    ///
    /// The controller only serves vehicles at or after their arrival tick,
    /// so `start_tick >= arrival_tick` holds by construction.
    pub fn into_record(self, start_tick: u64) -> VehicleRecord {
        debug_assert!(start_tick >= self.arrival_tick);

        let waiting = start_tick - self.arrival_tick;
        let completion_tick = start_tick + BURST_TICKS;

        VehicleRecord {
            id: self.id,
            direction: self.direction,
            arrival_tick: self.arrival_tick,
            start_tick,
            completion_tick,
            waiting,
            turnaround: completion_tick - self.arrival_tick,
            response: waiting,
        }
    }
}

/// Timing record of a served vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub id: String,
    pub direction: Direction,
    pub arrival_tick: u64,
    /// Tick at which service started. Set exactly once.
    pub start_tick: u64,
    /// Always `start_tick + BURST_TICKS`.
    pub completion_tick: u64,
    pub waiting: u64,
    pub turnaround: u64,
    pub response: u64,
}

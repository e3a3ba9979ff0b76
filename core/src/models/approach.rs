//! Approach model
//!
//! One per cardinal direction, created at simulation start and alive for
//! the whole run. Only the queue and counters mutate; the arrival rate and
//! static priority are fixed at configuration time.
//!
//! # Critical Invariants
//!
//! 1. The pending queue never exceeds the configured capacity; arrivals
//!    beyond it are dropped (counted, not errored).
//! 2. `dynamic_priority >= static_priority` at all times — aging and
//!    starvation boosts only ever add a non-negative bonus.
//! 3. Vehicles leave the queue exactly once, through [`Approach::serve`].

use crate::models::direction::Direction;
use crate::models::vehicle::{Vehicle, VehicleRecord};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Per-direction vehicle queue with priority and service statistics.
///
/// # Example
/// ```
/// use intersection_core::{Approach, Direction, Vehicle};
///
/// let mut approach = Approach::new(Direction::North, 0.6, 4.0, 50, 5);
/// approach.enqueue(Vehicle::new("N0".to_string(), Direction::North, 0));
///
/// let record = approach.serve(2).unwrap();
/// assert_eq!(record.waiting, 2);
/// assert_eq!(approach.served_count(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Approach {
    direction: Direction,

    /// Arrival rate in vehicles per second. Immutable during a run.
    arrival_rate: f64,

    /// Fixed priority assigned at configuration time.
    static_priority: f64,

    /// `static_priority` plus the current aging (and starvation) bonus.
    /// Recomputed every tick so snapshots stay current.
    dynamic_priority: f64,

    /// Pending vehicles, FIFO. Head is served first.
    queue: VecDeque<Vehicle>,

    /// Queue capacity; arrivals beyond it are dropped.
    capacity: usize,

    /// Ticks since last served, while non-empty and not green.
    age_ticks: u64,

    served_count: u64,

    /// Arrivals discarded because the queue was at capacity.
    dropped_count: u64,

    /// Times the hybrid policy found this approach starved past its
    /// threshold.
    starvation_count: u64,

    total_waiting: u64,
    total_turnaround: u64,
    total_response: u64,

    /// Most recent completed-vehicle records, oldest discarded first.
    completed: VecDeque<VehicleRecord>,
    completed_retention: usize,
}

impl Approach {
    /// Create an empty approach.
    pub fn new(
        direction: Direction,
        arrival_rate: f64,
        static_priority: f64,
        capacity: usize,
        completed_retention: usize,
    ) -> Self {
        Self {
            direction,
            arrival_rate,
            static_priority,
            dynamic_priority: static_priority,
            queue: VecDeque::new(),
            capacity,
            age_ticks: 0,
            served_count: 0,
            dropped_count: 0,
            starvation_count: 0,
            total_waiting: 0,
            total_turnaround: 0,
            total_response: 0,
            completed: VecDeque::new(),
            completed_retention,
        }
    }

    // ========================================================================
    // Queue management
    // ========================================================================

    /// Append a vehicle to the pending queue.
    ///
    /// Returns `false` if the queue is at capacity; the vehicle is then
    /// discarded and counted in `dropped_count`. This is the documented
    /// lossy backpressure policy, not an error.
    pub fn enqueue(&mut self, vehicle: Vehicle) -> bool {
        if self.queue.len() >= self.capacity {
            self.dropped_count += 1;
            return false;
        }
        self.queue.push_back(vehicle);
        true
    }

    /// Serve the head vehicle (earliest arrival first).
    ///
    /// Stamps start/completion ticks, records the completed vehicle,
    /// updates the cumulative statistics, and resets the age counter.
    ///
    /// Returns `None` when the queue is empty — a normal outcome (an idle
    /// green tick), not an error.
    pub fn serve(&mut self, tick: u64) -> Option<VehicleRecord> {
        let vehicle = self.queue.pop_front()?;
        let record = vehicle.into_record(tick);

        self.served_count += 1;
        self.total_waiting += record.waiting;
        self.total_turnaround += record.turnaround;
        self.total_response += record.response;
        self.age_ticks = 0;

        self.completed.push_back(record.clone());
        while self.completed.len() > self.completed_retention {
            self.completed.pop_front();
        }

        Some(record)
    }

    /// Increment the age counter by one tick. The controller calls this
    /// for every approach that is non-empty and not currently holding the
    /// right of way.
    pub fn tick_age(&mut self) {
        if !self.queue.is_empty() {
            self.age_ticks += 1;
        }
    }

    // ========================================================================
    // Priority
    // ========================================================================

    /// Recompute the dynamic priority from the aging formula
    /// `static + age × coefficient`. Called for every approach every tick,
    /// whether or not it will be picked, so the snapshot value is current.
    pub fn refresh_dynamic_priority(&mut self, aging_coefficient: f64) {
        self.dynamic_priority = self.static_priority + self.age_ticks as f64 * aging_coefficient;
    }

    /// Add a starvation bonus on top of the current dynamic priority and
    /// count the starvation occurrence. Used by the hybrid policy only.
    pub fn apply_starvation_boost(&mut self, bonus: f64) {
        self.dynamic_priority += bonus;
        self.starvation_count += 1;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn arrival_rate(&self) -> f64 {
        self.arrival_rate
    }

    pub fn static_priority(&self) -> f64 {
        self.static_priority
    }

    pub fn dynamic_priority(&self) -> f64 {
        self.dynamic_priority
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn age_ticks(&self) -> u64 {
        self.age_ticks
    }

    pub fn served_count(&self) -> u64 {
        self.served_count
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped_count
    }

    pub fn starvation_count(&self) -> u64 {
        self.starvation_count
    }

    /// Pending vehicles in FIFO order.
    pub fn queued_vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.queue.iter()
    }

    /// Recent completed-vehicle records, oldest first.
    pub fn completed(&self) -> impl Iterator<Item = &VehicleRecord> {
        self.completed.iter()
    }

    pub fn average_waiting(&self) -> f64 {
        Self::average(self.total_waiting, self.served_count)
    }

    pub fn average_turnaround(&self) -> f64 {
        Self::average(self.total_turnaround, self.served_count)
    }

    pub fn average_response(&self) -> f64 {
        Self::average(self.total_response, self.served_count)
    }

    pub fn total_waiting(&self) -> u64 {
        self.total_waiting
    }

    fn average(total: u64, count: u64) -> f64 {
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approach_with_capacity(capacity: usize) -> Approach {
        Approach::new(Direction::West, 0.35, 1.0, capacity, 5)
    }

    fn vehicle(id: &str, tick: u64) -> Vehicle {
        Vehicle::new(id.to_string(), Direction::West, tick)
    }

    #[test]
    fn test_enqueue_respects_capacity() {
        let mut approach = approach_with_capacity(2);

        assert!(approach.enqueue(vehicle("W0", 0)));
        assert!(approach.enqueue(vehicle("W1", 0)));
        assert!(!approach.enqueue(vehicle("W2", 0)));

        assert_eq!(approach.queue_len(), 2);
        assert_eq!(approach.dropped_count(), 1);
    }

    #[test]
    fn test_serve_is_fifo() {
        let mut approach = approach_with_capacity(50);
        approach.enqueue(vehicle("W0", 0));
        approach.enqueue(vehicle("W1", 1));

        assert_eq!(approach.serve(5).unwrap().id, "W0");
        assert_eq!(approach.serve(6).unwrap().id, "W1");
        assert!(approach.serve(7).is_none());
    }

    #[test]
    fn test_serve_resets_age_and_accumulates_wait() {
        let mut approach = approach_with_capacity(50);
        approach.enqueue(vehicle("W0", 0));

        approach.tick_age();
        approach.tick_age();
        assert_eq!(approach.age_ticks(), 2);

        let record = approach.serve(2).unwrap();
        assert_eq!(record.waiting, 2);
        assert_eq!(approach.age_ticks(), 0);
        assert_eq!(approach.served_count(), 1);
        assert!((approach.average_waiting() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_approach_does_not_age() {
        let mut approach = approach_with_capacity(50);
        approach.tick_age();
        assert_eq!(approach.age_ticks(), 0);
    }

    #[test]
    fn test_dynamic_priority_never_below_static() {
        let mut approach = approach_with_capacity(50);
        approach.enqueue(vehicle("W0", 0));

        approach.refresh_dynamic_priority(0.1);
        assert!(approach.dynamic_priority() >= approach.static_priority());

        for _ in 0..30 {
            approach.tick_age();
        }
        approach.refresh_dynamic_priority(0.1);
        assert!((approach.dynamic_priority() - 4.0).abs() < 1e-9);

        approach.apply_starvation_boost(2.0);
        assert!(approach.dynamic_priority() >= approach.static_priority());
        assert_eq!(approach.starvation_count(), 1);
    }

    #[test]
    fn test_completed_history_is_bounded() {
        let mut approach = Approach::new(Direction::West, 0.0, 1.0, 50, 3);
        for i in 0..6 {
            approach.enqueue(vehicle(&format!("W{}", i), 0));
        }
        for tick in 0..6 {
            approach.serve(tick);
        }

        let ids: Vec<&str> = approach.completed().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["W3", "W4", "W5"]);
    }
}

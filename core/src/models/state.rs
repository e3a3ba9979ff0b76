//! Simulation State
//!
//! Holds everything the scheduler mutates: the four approaches and the
//! bounded timeline (Gantt) log. One instance per controller; multiple
//! independent simulations can coexist for testing.
//!
//! # Critical Invariants
//!
//! 1. Exactly four approaches, one per cardinal direction, created at
//!    start and never replaced.
//! 2. The timeline never exceeds its retention length; the oldest entry
//!    is discarded first.

use crate::models::approach::Approach;
use crate::models::direction::{Direction, NUM_APPROACHES};
use crate::signal::Phase;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One tick of Gantt history: which approach (if any) held the right of
/// way, in which phase, and which vehicle (if any) was served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub tick: u64,
    pub approach: Option<Direction>,
    pub phase: Phase,
    pub served_vehicle_id: Option<String>,
}

/// Complete mutable state of one intersection simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    /// The four approaches, indexed by `Direction::index()`.
    approaches: [Approach; NUM_APPROACHES],

    /// Recent per-tick history, oldest first.
    timeline: VecDeque<TimelineEntry>,
    timeline_retention: usize,
}

impl SimulationState {
    /// Create state from pre-built approaches.
    ///
    /// The array is indexed by direction, so callers build it with
    /// `Direction::ALL.map(...)`.
    pub fn new(approaches: [Approach; NUM_APPROACHES], timeline_retention: usize) -> Self {
        Self {
            approaches,
            timeline: VecDeque::new(),
            timeline_retention,
        }
    }

    pub fn approach(&self, direction: Direction) -> &Approach {
        &self.approaches[direction.index()]
    }

    pub fn approach_mut(&mut self, direction: Direction) -> &mut Approach {
        &mut self.approaches[direction.index()]
    }

    pub fn approaches(&self) -> &[Approach; NUM_APPROACHES] {
        &self.approaches
    }

    pub fn approaches_mut(&mut self) -> &mut [Approach; NUM_APPROACHES] {
        &mut self.approaches
    }

    /// True when no approach has a pending vehicle.
    pub fn all_queues_empty(&self) -> bool {
        self.approaches.iter().all(|a| a.is_empty())
    }

    /// Append a timeline entry, discarding the oldest beyond retention.
    pub fn record(&mut self, entry: TimelineEntry) {
        self.timeline.push_back(entry);
        while self.timeline.len() > self.timeline_retention {
            self.timeline.pop_front();
        }
    }

    /// Recent timeline entries, oldest first.
    pub fn timeline(&self) -> impl Iterator<Item = &TimelineEntry> {
        self.timeline.iter()
    }

    pub fn timeline_len(&self) -> usize {
        self.timeline.len()
    }

    /// Change the timeline retention. Applied at tick boundaries; trims
    /// immediately if shrinking.
    pub fn set_timeline_retention(&mut self, retention: usize) {
        self.timeline_retention = retention;
        while self.timeline.len() > self.timeline_retention {
            self.timeline.pop_front();
        }
    }

    pub fn total_served(&self) -> u64 {
        self.approaches.iter().map(|a| a.served_count()).sum()
    }

    pub fn total_waiting(&self) -> u64 {
        self.approaches.iter().map(|a| a.total_waiting()).sum()
    }
}

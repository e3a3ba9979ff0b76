//! Read-only snapshot surface for external consumers.
//!
//! Exporters, renderers, and the CLI observe the simulation through
//! [`Snapshot`] only — never through mutable state. The snapshot is a
//! plain serializable value, detached from the controller the moment it
//! is produced.

use crate::models::direction::Direction;
use crate::models::state::TimelineEntry;
use crate::models::{Approach, VehicleRecord};
use crate::orchestrator::engine::IntersectionController;
use crate::signal::Phase;
use serde::{Deserialize, Serialize};

/// Per-approach view: queue depth, priorities, counters, averages, and
/// the recent completed-vehicle records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproachSnapshot {
    pub direction: Direction,
    pub queue_length: usize,
    pub arrival_rate: f64,
    pub static_priority: f64,
    pub dynamic_priority: f64,
    pub served_count: u64,
    pub dropped_count: u64,
    pub age_ticks: u64,
    pub starvation_count: u64,
    pub average_waiting: f64,
    pub average_turnaround: f64,
    pub average_response: f64,
    pub recent_completed: Vec<VehicleRecord>,
}

impl From<&Approach> for ApproachSnapshot {
    fn from(approach: &Approach) -> Self {
        ApproachSnapshot {
            direction: approach.direction(),
            queue_length: approach.queue_len(),
            arrival_rate: approach.arrival_rate(),
            static_priority: approach.static_priority(),
            dynamic_priority: approach.dynamic_priority(),
            served_count: approach.served_count(),
            dropped_count: approach.dropped_count(),
            age_ticks: approach.age_ticks(),
            starvation_count: approach.starvation_count(),
            average_waiting: approach.average_waiting(),
            average_turnaround: approach.average_turnaround(),
            average_response: approach.average_response(),
            recent_completed: approach.completed().cloned().collect(),
        }
    }
}

/// Point-in-time view of the whole simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Completed ticks at capture time.
    pub tick: u64,

    /// `"NORTH"`/`"SOUTH"`/`"EAST"`/`"WEST"`, or `"NONE"` when no approach
    /// holds or is clearing the right of way.
    pub current_approach: String,

    pub phase: Phase,

    /// `"RoundRobin"`, `"StaticPriority"`, `"DynamicPriority"`, or
    /// `"Hybrid"`.
    pub scheduler_name: String,

    /// Recent Gantt history, oldest first, bounded by the configured
    /// retention.
    pub timeline: Vec<TimelineEntry>,

    pub approaches: Vec<ApproachSnapshot>,

    pub total_served: u64,

    /// Average waiting time across all served vehicles, all approaches.
    pub average_waiting: f64,
}

impl IntersectionController {
    /// Produce the externally-consumable snapshot.
    pub fn snapshot(&self) -> Snapshot {
        let total_served = self.state().total_served();
        let average_waiting = if total_served == 0 {
            0.0
        } else {
            self.state().total_waiting() as f64 / total_served as f64
        };

        Snapshot {
            tick: self.current_tick(),
            current_approach: self
                .current_approach()
                .map(|d| d.name().to_string())
                .unwrap_or_else(|| "NONE".to_string()),
            phase: self.phase(),
            scheduler_name: self.policy_name().to_string(),
            timeline: self.state().timeline().cloned().collect(),
            approaches: self
                .state()
                .approaches()
                .iter()
                .map(ApproachSnapshot::from)
                .collect(),
            total_served,
            average_waiting,
        }
    }
}

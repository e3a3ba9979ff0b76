//! Event logging for diagnostics and export.
//!
//! The core never prints or writes files; it records typed events instead.
//! Presentation layers (the CLI, exporters) read the log and render it
//! however they like — the original UI showed it as a scrolling panel and
//! offered a CSV download.
//!
//! All events carry the tick at which they occurred; events within a tick
//! are logged in the order the tick loop produced them.

use crate::models::direction::Direction;
use crate::signal::Phase;
use serde::{Deserialize, Serialize};

/// Simulation event capturing a state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// A generated vehicle joined an approach queue.
    Arrival {
        tick: u64,
        direction: Direction,
        vehicle_id: String,
    },

    /// A generated vehicle was discarded because the queue was at
    /// capacity. Deliberate backpressure, not a failure.
    ArrivalDropped {
        tick: u64,
        direction: Direction,
        vehicle_id: String,
    },

    /// The signal phase changed.
    PhaseChange {
        tick: u64,
        from: Phase,
        to: Phase,
        /// Approach holding/clearing the right of way after the change.
        approach: Option<Direction>,
    },

    /// The policy granted a fresh green.
    GreenGranted {
        tick: u64,
        direction: Direction,
        policy: String,
        quantum: u32,
    },

    /// One vehicle crossed the intersection.
    VehicleServed {
        tick: u64,
        direction: Direction,
        vehicle_id: String,
        waited: u64,
    },

    /// A selection was due but every queue was empty.
    AllQueuesEmpty { tick: u64 },

    /// A reconfiguration command took effect at this tick boundary.
    Reconfigured {
        tick: u64,
        parameter: String,
        value: String,
    },
}

impl Event {
    /// Tick at which this event occurred.
    pub fn tick(&self) -> u64 {
        match self {
            Event::Arrival { tick, .. } => *tick,
            Event::ArrivalDropped { tick, .. } => *tick,
            Event::PhaseChange { tick, .. } => *tick,
            Event::GreenGranted { tick, .. } => *tick,
            Event::VehicleServed { tick, .. } => *tick,
            Event::AllQueuesEmpty { tick } => *tick,
            Event::Reconfigured { tick, .. } => *tick,
        }
    }
}

/// Append-only log of all simulation events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events from a single tick, in log order.
    pub fn events_at(&self, tick: u64) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.tick() == tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_preserves_order_and_filters_by_tick() {
        let mut log = EventLog::new();
        log.log(Event::AllQueuesEmpty { tick: 1 });
        log.log(Event::Arrival {
            tick: 2,
            direction: Direction::North,
            vehicle_id: "N0".to_string(),
        });
        log.log(Event::VehicleServed {
            tick: 2,
            direction: Direction::North,
            vehicle_id: "N0".to_string(),
            waited: 0,
        });

        assert_eq!(log.len(), 3);
        assert_eq!(log.events_at(2).count(), 2);
        assert!(matches!(log.events()[0], Event::AllQueuesEmpty { tick: 1 }));
    }
}

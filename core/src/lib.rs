//! Intersection Simulator Core
//!
//! Tick-driven four-approach road intersection scheduler with
//! deterministic execution.
//!
//! # Architecture
//!
//! - **core**: Tick clock
//! - **models**: Domain types (Direction, Vehicle, Approach, State, Event)
//! - **arrivals**: Poisson vehicle generation
//! - **signal**: GREEN/YELLOW/ALL_RED/NONE phase machine
//! - **policy**: Scheduler policies (right-of-way selection)
//! - **orchestrator**: Controller, snapshot, checkpoint, real-time driver
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All randomness is deterministic (seeded xorshift64*)
//! 2. At most one vehicle is served per tick
//! 3. The core performs no I/O; exporters consume the snapshot surface

// Module declarations
pub mod arrivals;
pub mod core;
pub mod models;
pub mod orchestrator;
pub mod policy;
pub mod rng;
pub mod signal;

// Re-exports for convenience
pub use arrivals::ArrivalGenerator;
pub use crate::core::time::TickClock;
pub use models::{
    Approach, Direction, Event, EventLog, SimulationState, TimelineEntry, Vehicle, VehicleRecord,
    BURST_TICKS, NUM_APPROACHES,
};
pub use orchestrator::{
    ApproachConfig, ApproachSnapshot, ConfigError, IntersectionController, ReconfigureCommand,
    SimulationConfig, SimulationDriver, SimulationError, Snapshot, StateSnapshot, TickResult,
};
pub use policy::{
    DynamicPriorityPolicy, HybridPolicy, PolicyConfig, RoundRobinPolicy, SchedulerPolicy,
    StaticPriorityPolicy,
};
pub use rng::RngManager;
pub use signal::{Advance, Phase, SignalMachine};

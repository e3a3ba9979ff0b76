//! Orchestrator - the tick loop and its surfaces.
//!
//! `engine.rs` holds the controller and the per-tick sequencing;
//! `snapshot.rs` the read-only export contract; `checkpoint.rs`
//! save/restore; `driver.rs` the wall-clock-paced runner.

pub mod checkpoint;
pub mod driver;
pub mod engine;
pub mod snapshot;

// Re-export main types for convenience
pub use checkpoint::{compute_config_hash, StateSnapshot};
pub use driver::SimulationDriver;
pub use engine::{
    ApproachConfig, ConfigError, IntersectionController, ReconfigureCommand, SimulationConfig,
    SimulationError, TickResult,
};
pub use snapshot::{ApproachSnapshot, Snapshot};

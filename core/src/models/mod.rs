//! Domain models: directions, vehicles, approaches, simulation state,
//! and the event log.

pub mod approach;
pub mod direction;
pub mod event;
pub mod state;
pub mod vehicle;

pub use approach::Approach;
pub use direction::{Direction, NUM_APPROACHES};
pub use event::{Event, EventLog};
pub use state::{SimulationState, TimelineEntry};
pub use vehicle::{Vehicle, VehicleRecord, BURST_TICKS};

//! Core primitives: simulation time.

pub mod time;

//! Deterministic random number generation
//!
//! Uses the xorshift64* algorithm for fast, deterministic random number
//! generation. All randomness in the simulator MUST go through this module
//! so that a seed fully determines a run.

mod xorshift;

pub use xorshift::RngManager;

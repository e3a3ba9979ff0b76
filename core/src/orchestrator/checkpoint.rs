//! Checkpoint - Save/Load Simulation State
//!
//! Serializable snapshots for pause/resume. A restored controller replays
//! identically to one that never stopped.
//!
//! # Critical Invariants
//!
//! - **Determinism**: the RNG state and the per-approach vehicle ID
//!   counters are carried, so post-restore arrivals match exactly.
//! - **Config matching**: a snapshot can only be restored under the
//!   configuration it was taken with, verified by SHA-256 hash.
//! - **Policy state**: the round-robin rotation pointer survives; the
//!   other policies are stateless between invocations.
//!
//! The timeline and event log are diagnostics, not simulation inputs, and
//! are deliberately not part of the snapshot.

use crate::models::direction::NUM_APPROACHES;
use crate::models::Approach;
use crate::orchestrator::engine::SimulationError;
use crate::signal::Phase;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Complete resumable simulation state.
///
/// Produced by [`IntersectionController::checkpoint`] and consumed by
/// [`IntersectionController::restore`].
///
/// [`IntersectionController::checkpoint`]: crate::orchestrator::IntersectionController::checkpoint
/// [`IntersectionController::restore`]: crate::orchestrator::IntersectionController::restore
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Completed ticks at capture time.
    pub tick: u64,

    /// xorshift64* state (CRITICAL for determinism).
    pub rng_state: u64,

    /// Signal machine position.
    pub phase: Phase,
    pub active_approach: Option<usize>,
    pub phase_remaining: u32,

    /// Round-robin rotation pointer; `None` for the other policies.
    pub round_robin_next: Option<usize>,

    /// The four approaches with their queues and counters.
    pub approaches: [Approach; NUM_APPROACHES],

    /// Per-approach vehicle ID counters.
    pub next_vehicle_ids: [u64; NUM_APPROACHES],

    /// SHA-256 of the configuration JSON (for restore validation).
    pub config_hash: String,
}

/// Compute the deterministic SHA-256 hash of a configuration.
///
/// The config is a plain struct, so its JSON field order is fixed by the
/// declaration and the serialization is already canonical.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, SimulationError> {
    let json = serde_json::to_string(config)
        .map_err(|e| SimulationError::Serialization(format!("config serialization: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

//! Scheduler Policy Module
//!
//! A policy decides which approach receives the next green. The controller
//! invokes it only when a phase change to GREEN is due (ALL_RED expiry, or
//! while idle in NONE) — never mid-green — and never branches on the policy
//! name inside the tick loop: the policy is built once from
//! [`PolicyConfig`] and called uniformly through the trait.
//!
//! The four policies mirror classic CPU-scheduling trade-offs in a
//! traffic-control setting:
//!
//! 1. **RoundRobin**: fairness — strict circular rotation over non-empty
//!    approaches.
//! 2. **StaticPriority**: throughput for favoured approaches — highest
//!    fixed priority wins, low priorities can starve.
//! 3. **DynamicPriority**: aging — `static + age × coefficient`, so a
//!    long-waiting approach eventually outranks any static ordering.
//! 4. **Hybrid**: dynamic priority plus an explicit starvation boost once
//!    an approach's age crosses a threshold.
//!
//! # Eligibility
//!
//! An approach with an empty queue is never selected. When every approach
//! is empty, `select_next` returns `None` and the controller settles the
//! signal into the NONE phase rather than granting a green to nobody.

use crate::models::approach::Approach;
use crate::models::direction::NUM_APPROACHES;
use serde::{Deserialize, Serialize};
use std::any::Any;

mod dynamic_priority;
mod hybrid;
mod round_robin;
mod static_priority;

pub use dynamic_priority::DynamicPriorityPolicy;
pub use hybrid::HybridPolicy;
pub use round_robin::RoundRobinPolicy;
pub use static_priority::StaticPriorityPolicy;

/// Scheduler policy trait
///
/// Implementations may keep internal state (the round-robin rotation
/// pointer) and may mutate approach priority fields as a documented side
/// effect (dynamic recomputation, starvation boosts) — that is how the
/// snapshot stays current even for approaches that were not picked.
pub trait SchedulerPolicy: Send {
    /// Stable policy name for snapshots and logs.
    fn name(&self) -> &'static str;

    /// Select the approach to receive the next green.
    ///
    /// Returns `None` when no approach is eligible (all queues empty).
    fn select_next(&mut self, approaches: &mut [Approach; NUM_APPROACHES]) -> Option<usize>;

    /// Enable downcasting to concrete types (checkpointing needs the
    /// round-robin rotation pointer).
    fn as_any(&self) -> &dyn Any;
}

/// Policy selection, fixed at configuration time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PolicyConfig {
    /// Strict circular rotation over eligible approaches.
    RoundRobin,

    /// Highest static priority wins; ties broken by lowest index.
    StaticPriority,

    /// Aging: `static + age × coefficient`, recomputed for every approach
    /// on every invocation. The coefficient comes from the simulation
    /// config.
    DynamicPriority,

    /// Dynamic priority with an additive starvation boost.
    Hybrid {
        /// Age (in ticks) beyond which an eligible approach counts as
        /// starved.
        starvation_threshold: u64,
        /// Priority bonus added to a starved approach before selection.
        starvation_bonus: f64,
    },
}

impl PolicyConfig {
    /// Build the policy executor for this configuration.
    ///
    /// `aging_coefficient` is threaded from the simulation config so the
    /// dynamic and hybrid policies recompute with the same formula the
    /// controller uses for per-tick snapshot refreshes.
    pub fn build(&self, aging_coefficient: f64) -> Box<dyn SchedulerPolicy> {
        match self {
            PolicyConfig::RoundRobin => Box::new(RoundRobinPolicy::new()),
            PolicyConfig::StaticPriority => Box::new(StaticPriorityPolicy::new()),
            PolicyConfig::DynamicPriority => {
                Box::new(DynamicPriorityPolicy::new(aging_coefficient))
            }
            PolicyConfig::Hybrid {
                starvation_threshold,
                starvation_bonus,
            } => Box::new(HybridPolicy::new(
                aging_coefficient,
                *starvation_threshold,
                *starvation_bonus,
            )),
        }
    }
}

/// Shared selection rule for the priority-family policies: the eligible
/// approach with the highest value of `key`, ties broken by lowest index.
pub(crate) fn select_highest<F>(approaches: &[Approach; NUM_APPROACHES], key: F) -> Option<usize>
where
    F: Fn(&Approach) -> f64,
{
    let mut best: Option<(usize, f64)> = None;
    for (idx, approach) in approaches.iter().enumerate() {
        if approach.is_empty() {
            continue;
        }
        let value = key(approach);
        match best {
            // Strict > keeps the first-registered approach on ties.
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_select_highest_skips_empty_and_breaks_ties_low() {
        let mut approaches = approaches_with_priorities([2.0, 2.0, 2.0, 5.0]);

        // All empty: nothing eligible.
        assert_eq!(select_highest(&approaches, |a| a.static_priority()), None);

        // Highest priority is WEST but it stays empty; the tie between
        // NORTH and SOUTH goes to NORTH (lower index).
        seed_vehicles(&mut approaches[0], 1);
        seed_vehicles(&mut approaches[1], 1);
        assert_eq!(
            select_highest(&approaches, |a| a.static_priority()),
            Some(0)
        );
    }

    #[test]
    fn test_factory_names() {
        assert_eq!(PolicyConfig::RoundRobin.build(0.1).name(), "RoundRobin");
        assert_eq!(
            PolicyConfig::StaticPriority.build(0.1).name(),
            "StaticPriority"
        );
        assert_eq!(
            PolicyConfig::DynamicPriority.build(0.1).name(),
            "DynamicPriority"
        );
        assert_eq!(
            PolicyConfig::Hybrid {
                starvation_threshold: 50,
                starvation_bonus: 2.0
            }
            .build(0.1)
            .name(),
            "Hybrid"
        );
    }
}

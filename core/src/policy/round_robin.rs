//! Round-Robin Policy
//!
//! Fairness baseline: scans circularly from just past the last selection
//! and grants the first non-empty approach, so every eligible approach is
//! visited before any repeats. No priorities are consulted.

use super::SchedulerPolicy;
use crate::models::approach::Approach;
use crate::models::direction::NUM_APPROACHES;
use std::any::Any;

/// Round-robin policy with a persistent rotation pointer.
///
/// # Example
/// ```
/// use intersection_core::policy::{RoundRobinPolicy, SchedulerPolicy};
/// use intersection_core::{Approach, Direction, Vehicle};
///
/// let mut approaches = Direction::ALL.map(|d| Approach::new(d, 0.0, 1.0, 50, 5));
/// approaches[2].enqueue(Vehicle::new("E0".to_string(), Direction::East, 0));
///
/// let mut policy = RoundRobinPolicy::new();
/// assert_eq!(policy.select_next(&mut approaches), Some(2));
/// ```
pub struct RoundRobinPolicy {
    /// Index the next scan starts from: one past the last selection.
    next_index: usize,
}

impl RoundRobinPolicy {
    pub fn new() -> Self {
        Self { next_index: 0 }
    }

    /// Current rotation pointer (checkpointing).
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Rebuild mid-rotation (checkpoint restore).
    pub fn from_checkpoint(next_index: usize) -> Self {
        Self {
            next_index: next_index % NUM_APPROACHES,
        }
    }
}

impl Default for RoundRobinPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulerPolicy for RoundRobinPolicy {
    fn name(&self) -> &'static str {
        "RoundRobin"
    }

    fn select_next(&mut self, approaches: &mut [Approach; NUM_APPROACHES]) -> Option<usize> {
        for offset in 0..NUM_APPROACHES {
            let idx = (self.next_index + offset) % NUM_APPROACHES;
            if !approaches[idx].is_empty() {
                self.next_index = (idx + 1) % NUM_APPROACHES;
                return Some(idx);
            }
        }
        None
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_rotates_through_all_eligible() {
        let mut approaches = approaches_with_priorities([4.0, 3.0, 2.0, 1.0]);
        for a in approaches.iter_mut() {
            seed_vehicles(a, 10);
        }

        let mut policy = RoundRobinPolicy::new();
        let picks: Vec<usize> = (0..8)
            .map(|_| policy.select_next(&mut approaches).unwrap())
            .collect();

        assert_eq!(picks, vec![0, 1, 2, 3, 0, 1, 2, 3]);
    }

    #[test]
    fn test_skips_empty_approaches() {
        let mut approaches = approaches_with_priorities([4.0, 3.0, 2.0, 1.0]);
        seed_vehicles(&mut approaches[1], 5);
        seed_vehicles(&mut approaches[3], 5);

        let mut policy = RoundRobinPolicy::new();
        assert_eq!(policy.select_next(&mut approaches), Some(1));
        assert_eq!(policy.select_next(&mut approaches), Some(3));
        assert_eq!(policy.select_next(&mut approaches), Some(1));
    }

    #[test]
    fn test_never_repeats_while_another_is_eligible() {
        let mut approaches = approaches_with_priorities([4.0, 3.0, 2.0, 1.0]);
        seed_vehicles(&mut approaches[0], 50);
        seed_vehicles(&mut approaches[2], 50);

        let mut policy = RoundRobinPolicy::new();
        let mut last = None;
        for _ in 0..20 {
            let pick = policy.select_next(&mut approaches);
            assert_ne!(pick, last, "repeated an approach while another was eligible");
            last = pick;
        }
    }

    #[test]
    fn test_all_empty_returns_none() {
        let mut approaches = approaches_with_priorities([4.0, 3.0, 2.0, 1.0]);
        let mut policy = RoundRobinPolicy::new();
        assert_eq!(policy.select_next(&mut approaches), None);
    }
}

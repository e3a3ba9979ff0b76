//! Hybrid Policy
//!
//! Starvation avoidance on top of dynamic priority. Before selecting, any
//! eligible approach whose age exceeds the starvation threshold receives
//! an additive priority bonus and has its starvation counter incremented;
//! selection then proceeds exactly like the dynamic policy, using the
//! boosted values.

use super::{select_highest, SchedulerPolicy};
use crate::models::approach::Approach;
use crate::models::direction::NUM_APPROACHES;
use std::any::Any;

/// Dynamic priority with an explicit starvation boost.
pub struct HybridPolicy {
    aging_coefficient: f64,
    starvation_threshold: u64,
    starvation_bonus: f64,
}

impl HybridPolicy {
    pub fn new(aging_coefficient: f64, starvation_threshold: u64, starvation_bonus: f64) -> Self {
        Self {
            aging_coefficient,
            starvation_threshold,
            starvation_bonus,
        }
    }

    pub fn starvation_threshold(&self) -> u64 {
        self.starvation_threshold
    }
}

impl SchedulerPolicy for HybridPolicy {
    fn name(&self) -> &'static str {
        "Hybrid"
    }

    fn select_next(&mut self, approaches: &mut [Approach; NUM_APPROACHES]) -> Option<usize> {
        for approach in approaches.iter_mut() {
            approach.refresh_dynamic_priority(self.aging_coefficient);

            if !approach.is_empty() && approach.age_ticks() > self.starvation_threshold {
                approach.apply_starvation_boost(self.starvation_bonus);
            }
        }
        select_highest(approaches, |a| a.dynamic_priority())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

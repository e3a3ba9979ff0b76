//! Dynamic Priority Policy with Aging
//!
//! Selection key is `static_priority + age_ticks × aging_coefficient`.
//! The recomputation runs for *every* approach on *every* invocation,
//! eligible or not — the side effect keeps the snapshot's dynamic-priority
//! values current even for approaches that will not be picked.
//!
//! Aging is what prevents starvation: a low-static-priority approach that
//! waits long enough accumulates a bonus that outgrows any fixed ordering.

use super::{select_highest, SchedulerPolicy};
use crate::models::approach::Approach;
use crate::models::direction::NUM_APPROACHES;
use std::any::Any;

/// Highest-dynamic-priority selection with aging.
pub struct DynamicPriorityPolicy {
    aging_coefficient: f64,
}

impl DynamicPriorityPolicy {
    pub fn new(aging_coefficient: f64) -> Self {
        Self { aging_coefficient }
    }

    pub fn aging_coefficient(&self) -> f64 {
        self.aging_coefficient
    }
}

impl SchedulerPolicy for DynamicPriorityPolicy {
    fn name(&self) -> &'static str {
        "DynamicPriority"
    }

    fn select_next(&mut self, approaches: &mut [Approach; NUM_APPROACHES]) -> Option<usize> {
        for approach in approaches.iter_mut() {
            approach.refresh_dynamic_priority(self.aging_coefficient);
        }
        select_highest(approaches, |a| a.dynamic_priority())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

//! Static Priority Policy
//!
//! The eligible approach with the highest fixed priority always wins,
//! regardless of how long others have waited. Ties go to the
//! first-registered (lowest index) approach. Starvation of low-priority
//! approaches is the known trade-off; the aging policies exist to fix it.

use super::{select_highest, SchedulerPolicy};
use crate::models::approach::Approach;
use crate::models::direction::NUM_APPROACHES;
use std::any::Any;

/// Stateless highest-static-priority selection.
pub struct StaticPriorityPolicy;

impl StaticPriorityPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StaticPriorityPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulerPolicy for StaticPriorityPolicy {
    fn name(&self) -> &'static str {
        "StaticPriority"
    }

    fn select_next(&mut self, approaches: &mut [Approach; NUM_APPROACHES]) -> Option<usize> {
        select_highest(approaches, |a| a.static_priority())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

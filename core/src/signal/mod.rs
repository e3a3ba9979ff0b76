//! Signal phase state machine
//!
//! Sequences GREEN → YELLOW → ALL_RED → next GREEN for whichever approach
//! currently holds the right of way. The machine owns the phase timers but
//! not the selection: when a new green is due it reports
//! [`Advance::SelectionDue`] and the controller consults the scheduler
//! policy.
//!
//! Resolved model variants (the source designs disagreed):
//! - ALL_RED is a distinct clearance phase after YELLOW, not folded into it.
//! - A green runs its full time quantum; the policy is never re-evaluated
//!   mid-green, even if the green queue empties.
//! - From NONE (nothing queued anywhere) the machine grants the next green
//!   directly, without an intervening clearance.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Signal phase. Exactly one holds at any tick.
///
/// Serializes as the snapshot contract names: `"GREEN"`, `"YELLOW"`,
/// `"ALL_RED"`, `"NONE"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// One approach is being served.
    Green,
    /// The previously green approach is clearing; nothing is served.
    Yellow,
    /// Safety clearance between greens; nothing is served.
    AllRed,
    /// No approach holds or is acquiring the right of way (all queues
    /// empty). The controller re-polls the policy every tick.
    None,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Green => "GREEN",
            Phase::Yellow => "YELLOW",
            Phase::AllRed => "ALL_RED",
            Phase::None => "NONE",
        };
        f.write_str(name)
    }
}

/// What the controller must do for the current tick after advancing the
/// machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// In GREEN with quantum remaining: serve one vehicle from this
    /// approach index.
    ServeGreen(usize),
    /// A new green must be selected this tick (ALL_RED expired, or the
    /// machine is idle in NONE).
    SelectionDue,
    /// Clearance tick (YELLOW or ALL_RED still counting down); nothing to
    /// serve.
    Clearing,
}

/// The phase state machine for the single active right of way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalMachine {
    phase: Phase,
    /// Approach index holding (GREEN) or clearing (YELLOW) the right of
    /// way. `None` during ALL_RED and NONE.
    active: Option<usize>,
    /// Ticks left in the current timed phase: remaining green quantum,
    /// yellow countdown, or all-red countdown. Zero in NONE.
    remaining: u32,
}

impl SignalMachine {
    /// A fresh machine starts in NONE: no approach ever selected yet.
    pub fn new() -> Self {
        Self {
            phase: Phase::None,
            active: None,
            remaining: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The approach currently holding or clearing the right of way.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Ticks left in the current timed phase.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Advance the machine by one tick and report what the controller
    /// should do. Every transition resets the phase timer.
    pub fn advance(&mut self, yellow_duration: u32, all_red_duration: u32) -> Advance {
        match self.phase {
            Phase::Green => {
                if self.remaining == 0 {
                    // Quantum exhausted: start clearing.
                    self.phase = Phase::Yellow;
                    self.remaining = yellow_duration;
                    Advance::Clearing
                } else {
                    self.remaining -= 1;
                    // active is always Some while GREEN; enforced by grant().
                    Advance::ServeGreen(self.active.unwrap_or_default())
                }
            }
            Phase::Yellow => {
                self.remaining = self.remaining.saturating_sub(1);
                if self.remaining == 0 {
                    self.phase = Phase::AllRed;
                    self.active = None;
                    self.remaining = all_red_duration;
                }
                Advance::Clearing
            }
            Phase::AllRed => {
                self.remaining = self.remaining.saturating_sub(1);
                if self.remaining == 0 {
                    Advance::SelectionDue
                } else {
                    Advance::Clearing
                }
            }
            Phase::None => Advance::SelectionDue,
        }
    }

    /// Grant the right of way: transition to GREEN for `approach` with a
    /// fresh time quantum. Called by the controller after the policy
    /// selected an eligible approach.
    pub fn grant(&mut self, approach: usize, quantum: u32) {
        self.phase = Phase::Green;
        self.active = Some(approach);
        self.remaining = quantum;
    }

    /// No eligible approach: settle into NONE until arrivals appear.
    pub fn idle(&mut self) {
        self.phase = Phase::None;
        self.active = None;
        self.remaining = 0;
    }

    /// Rebuild a machine mid-phase (checkpoint restore).
    pub fn from_checkpoint(phase: Phase, active: Option<usize>, remaining: u32) -> Self {
        Self {
            phase,
            active,
            remaining,
        }
    }
}

impl Default for SignalMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_in_none_and_requests_selection() {
        let mut machine = SignalMachine::new();
        assert_eq!(machine.phase(), Phase::None);
        assert_eq!(machine.advance(2, 1), Advance::SelectionDue);
        // Still NONE until the controller grants or idles.
        assert_eq!(machine.phase(), Phase::None);
    }

    #[test]
    fn test_green_serves_for_full_quantum() {
        let mut machine = SignalMachine::new();
        machine.grant(2, 3);

        for _ in 0..3 {
            assert_eq!(machine.advance(2, 1), Advance::ServeGreen(2));
            assert_eq!(machine.phase(), Phase::Green);
        }

        // Quantum exhausted: next advance starts the yellow clearance.
        assert_eq!(machine.advance(2, 1), Advance::Clearing);
        assert_eq!(machine.phase(), Phase::Yellow);
        assert_eq!(machine.active(), Some(2));
    }

    #[test]
    fn test_yellow_then_all_red_then_selection() {
        let mut machine = SignalMachine::new();
        machine.grant(0, 1);

        assert_eq!(machine.advance(2, 1), Advance::ServeGreen(0));
        assert_eq!(machine.advance(2, 1), Advance::Clearing); // -> YELLOW(2)

        assert_eq!(machine.advance(2, 1), Advance::Clearing); // yellow 2 -> 1
        assert_eq!(machine.phase(), Phase::Yellow);
        assert_eq!(machine.advance(2, 1), Advance::Clearing); // yellow 1 -> 0, -> ALL_RED(1)
        assert_eq!(machine.phase(), Phase::AllRed);
        assert_eq!(machine.active(), None);

        assert_eq!(machine.advance(2, 1), Advance::SelectionDue);
    }

    #[test]
    fn test_idle_clears_active() {
        let mut machine = SignalMachine::new();
        machine.grant(1, 1);
        machine.idle();

        assert_eq!(machine.phase(), Phase::None);
        assert_eq!(machine.active(), None);
        assert_eq!(machine.remaining(), 0);
    }
}

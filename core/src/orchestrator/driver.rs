//! Real-time tick driver.
//!
//! Paces the tick loop against the wall clock so the simulation can run
//! live instead of as-fast-as-possible. The controller sits behind an
//! `Arc<Mutex<_>>`: the driver thread holds the lock for exactly one tick
//! at a time, so any other thread can take snapshots, queue
//! reconfiguration, or read the event log between ticks without stalling
//! the loop for longer than one tick's critical section.
//!
//! Stopping freezes state mid-run; queued vehicles simply wait until the
//! driver is started again or the owner steps it manually.

use crate::orchestrator::engine::{
    ConfigError, IntersectionController, ReconfigureCommand, TickResult,
};
use crate::orchestrator::snapshot::Snapshot;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Sleep slice so `stop()` is honoured promptly even at slow tick rates.
const STOP_POLL: Duration = Duration::from_millis(25);

/// Wall-clock-paced driver around an [`IntersectionController`].
///
/// One wall interval per tick: `tick_duration / speed`, where `speed` is
/// a runtime-adjustable factor (2.0 = twice real time).
pub struct SimulationDriver {
    controller: Arc<Mutex<IntersectionController>>,
    running: Arc<AtomicBool>,
    speed: Arc<Mutex<f64>>,
    handle: Option<JoinHandle<()>>,
}

impl SimulationDriver {
    pub fn new(controller: IntersectionController) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
            running: Arc::new(AtomicBool::new(false)),
            speed: Arc::new(Mutex::new(1.0)),
            handle: None,
        }
    }

    /// Start the paced loop. No-op if already running.
    pub fn start(&mut self) {
        if self.handle.is_some() {
            return;
        }
        self.running.store(true, Ordering::SeqCst);

        let controller = Arc::clone(&self.controller);
        let running = Arc::clone(&self.running);
        let speed = Arc::clone(&self.speed);

        self.handle = Some(thread::spawn(move || {
            while running.load(Ordering::SeqCst) {
                let interval = {
                    let mut controller = controller.lock().unwrap();
                    controller.tick();
                    controller.config().tick_duration_secs
                };
                let factor = *speed.lock().unwrap();
                sleep_while_running(&running, Duration::from_secs_f64(interval / factor));
            }
        }));
    }

    /// Stop the loop and wait for the in-flight tick to finish. State is
    /// frozen, not discarded.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Advance exactly one tick. Intended for a stopped driver; safe (but
    /// confusing) while running.
    pub fn step(&self) -> TickResult {
        self.controller.lock().unwrap().tick()
    }

    /// Snapshot of the current state; waits at most one tick.
    pub fn snapshot(&self) -> Snapshot {
        self.controller.lock().unwrap().snapshot()
    }

    /// Queue a reconfiguration; applied by the controller at the next tick
    /// boundary.
    pub fn request_reconfigure(&self, command: ReconfigureCommand) -> Result<(), ConfigError> {
        self.controller.lock().unwrap().request_reconfigure(command)
    }

    /// Adjust the pacing factor. Non-positive or non-finite values are
    /// ignored.
    pub fn set_speed(&self, factor: f64) {
        if factor > 0.0 && factor.is_finite() {
            *self.speed.lock().unwrap() = factor;
        }
    }

    /// Run a closure against the locked controller, for reads the
    /// snapshot doesn't carry (the event log).
    pub fn with_controller<R>(&self, f: impl FnOnce(&IntersectionController) -> R) -> R {
        f(&self.controller.lock().unwrap())
    }
}

impl Drop for SimulationDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

fn sleep_while_running(running: &AtomicBool, mut remaining: Duration) {
    while remaining > Duration::ZERO && running.load(Ordering::SeqCst) {
        let slice = remaining.min(STOP_POLL);
        thread::sleep(slice);
        remaining -= slice;
    }
}

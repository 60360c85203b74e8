//! Time sources for animations.
//!
//! Animations read elapsed time from a [`Clock`] on every frame. Hosts use
//! [`SystemClock`]; tests and trace replay drive a [`ManualClock`] so frame
//! timing is fully deterministic.

use std::cell::Cell;
use std::rc::Rc;
use web_time::Instant;

/// Monotonic millisecond time source.
pub trait Clock {
    /// Milliseconds since an arbitrary, fixed origin.
    fn now_ms(&self) -> f64;
}

/// Wall clock measured from the moment it was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Logical clock advanced explicitly.
///
/// Clones share the same time, so a test can keep a handle while the viewer
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    /// Move time forward by `delta_ms` (negative deltas are ignored).
    pub fn advance(&self, delta_ms: f64) {
        if delta_ms > 0.0 {
            self.now.set(self.now.get() + delta_ms);
        }
    }

    /// Jump to `time_ms` if it is not in the past.
    pub fn set(&self, time_ms: f64) {
        if time_ms > self.now.get() {
            self.now.set(time_ms);
        }
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

//! Pointer sample ring used to estimate release velocity.

use std::collections::VecDeque;

use crate::constants::{VELOCITY_SAMPLE_CAPACITY, VELOCITY_SAMPLE_MAX_AGE_MS};
use crate::transform::Point;

/// One pointer position at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub position: Point,
    pub time_ms: f64,
}

/// Velocity in viewport pixels per millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

impl Velocity {
    pub const ZERO: Velocity = Velocity { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn speed(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn scaled(&self, factor: f64) -> Velocity {
        Velocity::new(self.x * factor, self.y * factor)
    }
}

/// Bounded ring of recent pointer samples; the oldest sample is evicted on overflow.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerSamples {
    samples: VecDeque<PointerSample>,
    capacity: usize,
}

impl Default for PointerSamples {
    fn default() -> Self {
        Self::new(VELOCITY_SAMPLE_CAPACITY)
    }
}

impl PointerSamples {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a sample. Samples going back in time reset the window.
    pub fn push(&mut self, position: Point, time_ms: f64) {
        if !position.is_finite() || !time_ms.is_finite() {
            return;
        }
        if self.samples.back().is_some_and(|last| time_ms < last.time_ms) {
            self.samples.clear();
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(PointerSample { position, time_ms });
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Estimate the velocity at the newest sample.
    ///
    /// Uses the oldest sample that is at most [`VELOCITY_SAMPLE_MAX_AGE_MS`]
    /// older than the newest one, so a pointer that rested before release
    /// yields zero velocity.
    pub fn velocity(&self) -> Velocity {
        let Some(newest) = self.samples.back() else {
            return Velocity::ZERO;
        };
        let Some(oldest) = self
            .samples
            .iter()
            .find(|s| newest.time_ms - s.time_ms <= VELOCITY_SAMPLE_MAX_AGE_MS)
        else {
            return Velocity::ZERO;
        };

        let elapsed = newest.time_ms - oldest.time_ms;
        if elapsed <= 0.0 {
            return Velocity::ZERO;
        }
        Velocity::new(
            (newest.position.x - oldest.position.x) / elapsed,
            (newest.position.y - oldest.position.y) / elapsed,
        )
    }
}

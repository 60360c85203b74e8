//! Viewer tests driven by a logical clock and manually fired frames.


use std::cell::Cell;
use std::rc::Rc;

use crate::animation::ManualFrameScheduler;
use crate::clock::{Clock, ManualClock};
use crate::config::ViewerConfig;
use crate::transform::{Bounds, Size};

use super::Viewer;

/// Frame interval of a 60 Hz display, rounded.
const FRAME_MS: f64 = 16.0;

/// A viewer plus handles to its clock and frame queue.
struct Harness {
    viewer: Viewer<ManualFrameScheduler, ManualClock>,
    frames: ManualFrameScheduler,
    clock: ManualClock,
}

impl Harness {
    /// 800x600 viewport showing a 4000x3000 image.
    fn new() -> Self {
        Self::with_config(ViewerConfig::default())
    }

    fn with_config(config: ViewerConfig) -> Self {
        let frames = ManualFrameScheduler::new();
        let clock = ManualClock::new(0.0);
        let bounds = Bounds::new(Size::new(800.0, 600.0), Size::new(4000.0, 3000.0));
        let viewer = Viewer::new(bounds, &config, frames.clone(), clock.clone());
        Self { viewer, frames, clock }
    }

    fn now(&self) -> f64 {
        self.clock.now_ms()
    }

    /// Advance one frame interval and deliver every outstanding frame.
    fn frame(&mut self) {
        self.clock.advance(FRAME_MS);
        for id in self.frames.take_pending() {
            self.viewer.on_frame(id);
        }
    }

    /// Deliver frames until no animation asks for more. Returns the frame count.
    fn settle(&mut self) -> usize {
        let mut count = 0;
        while !self.frames.pending().is_empty() && count < 1000 {
            self.frame();
            count += 1;
        }
        count
    }

    /// Count listener calls.
    fn count_changes(&mut self) -> Rc<Cell<usize>> {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        self.viewer.subscribe(move |_| counter.set(counter.get() + 1));
        calls
    }
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

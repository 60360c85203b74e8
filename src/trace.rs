//! Recorded input traces and their deterministic replay.
//!
//! A trace is a JSON document with the viewport and content sizes, the host
//! frame interval and a list of timestamped raw events. Replay drives a
//! [`Viewer`] with a [`ManualClock`] and [`ManualFrameScheduler`], so the
//! same trace always produces the same transforms.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use lightbox_events::RawEvent;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::ManualFrameScheduler;
use crate::clock::{Clock, ManualClock};
use crate::config::ViewerConfig;
use crate::transform::{Bounds, Size, Transform};
use crate::viewer::Viewer;

/// Frame interval used when a trace does not specify a valid one.
pub const DEFAULT_FRAME_INTERVAL_MS: f64 = 16.0;

/// Upper bound on frames fired after the last event, in case an animation never settles.
const MAX_TRAILING_FRAMES: usize = 100_000;

/// Errors that can occur while loading a trace.
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse trace: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Trace contains no events")]
    Empty,
}

/// One raw event delivered at `time_ms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub time_ms: f64,
    pub event: RawEvent,
}

/// A recorded interaction session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub viewport: Size,
    pub content: Size,
    #[serde(default = "default_frame_interval")]
    pub frame_interval_ms: f64,
    pub events: Vec<TraceEvent>,
}

fn default_frame_interval() -> f64 {
    DEFAULT_FRAME_INTERVAL_MS
}

impl Trace {
    /// Parse a trace, ordering events by time.
    pub fn from_json(json: &str) -> Result<Self, TraceError> {
        let mut trace: Trace = serde_json::from_str(json)?;
        if trace.events.is_empty() {
            return Err(TraceError::Empty);
        }
        if !(trace.frame_interval_ms.is_finite() && trace.frame_interval_ms > 0.0) {
            log::warn!(
                "Invalid frame interval {}, using {} ms",
                trace.frame_interval_ms,
                DEFAULT_FRAME_INTERVAL_MS
            );
            trace.frame_interval_ms = DEFAULT_FRAME_INTERVAL_MS;
        }
        trace.events.sort_by(|a, b| a.time_ms.total_cmp(&b.time_ms));
        Ok(trace)
    }

    pub fn load(path: &Path) -> Result<Self, TraceError> {
        let json = std::fs::read_to_string(path)?;
        let trace = Self::from_json(&json)?;
        log::debug!("Loaded {} events from {:?}", trace.events.len(), path);
        Ok(trace)
    }
}

/// One transform change observed during replay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReplayChange {
    /// Logical time of the change
    pub time_ms: f64,
    pub transform: Transform,
    /// Interaction state right after the change
    pub state: &'static str,
}

/// Totals for a finished replay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReplaySummary {
    pub events: usize,
    pub frames: usize,
    pub changes: usize,
    pub end_time_ms: f64,
    pub final_transform: Transform,
    /// The last animation was still running when the frame limit hit
    pub unsettled: bool,
}

/// Feeds a trace through a viewer, firing frames at the trace's interval.
struct Replayer {
    viewer: Viewer<ManualFrameScheduler, ManualClock>,
    frames: ManualFrameScheduler,
    clock: ManualClock,
    interval: f64,
    changed: Rc<RefCell<Vec<Transform>>>,
    frame_count: usize,
    change_count: usize,
}

impl Replayer {
    fn new(trace: &Trace, config: &ViewerConfig) -> Self {
        let frames = ManualFrameScheduler::new();
        let start = trace.events.first().map_or(0.0, |e| e.time_ms);
        let clock = ManualClock::new(start);
        let bounds = Bounds::new(trace.viewport, trace.content);
        let mut viewer = Viewer::new(bounds, config, frames.clone(), clock.clone());

        let changed = Rc::new(RefCell::new(Vec::new()));
        let sink = changed.clone();
        viewer.subscribe(move |t| sink.borrow_mut().push(*t));

        Self {
            viewer,
            frames,
            clock,
            interval: trace.frame_interval_ms,
            changed,
            frame_count: 0,
            change_count: 0,
        }
    }

    /// Fire frames while any are requested, up to `until_ms` or `max_frames`.
    fn pump(&mut self, until_ms: Option<f64>, max_frames: usize, on_change: &mut impl FnMut(&ReplayChange)) {
        let mut fired = 0;
        while !self.frames.pending().is_empty() && fired < max_frames {
            let at = self.clock.now_ms() + self.interval;
            if until_ms.is_some_and(|until| at > until) {
                break;
            }
            self.clock.set(at);
            for id in self.frames.take_pending() {
                self.viewer.on_frame(id);
            }
            fired += 1;
            self.frame_count += 1;
            self.flush(on_change);
        }
    }

    fn flush(&mut self, on_change: &mut impl FnMut(&ReplayChange)) {
        let changed: Vec<Transform> = self.changed.borrow_mut().drain(..).collect();
        for transform in changed {
            self.change_count += 1;
            on_change(&ReplayChange {
                time_ms: self.clock.now_ms(),
                transform,
                state: self.viewer.state().name(),
            });
        }
    }
}

/// Replay `trace`, calling `on_change` for every transform change.
pub fn replay(trace: &Trace, config: &ViewerConfig, mut on_change: impl FnMut(&ReplayChange)) -> ReplaySummary {
    let mut replayer = Replayer::new(trace, config);

    for entry in &trace.events {
        replayer.pump(Some(entry.time_ms), usize::MAX, &mut on_change);
        replayer.clock.set(entry.time_ms);
        log::trace!("Replaying {:?}", entry.event);
        replayer.viewer.handle_event(&entry.event);
        replayer.flush(&mut on_change);
    }
    replayer.pump(None, MAX_TRAILING_FRAMES, &mut on_change);

    let unsettled = !replayer.frames.pending().is_empty();
    if unsettled {
        log::warn!("Animation still running after {} trailing frames", MAX_TRAILING_FRAMES);
    }

    ReplaySummary {
        events: trace.events.len(),
        frames: replayer.frame_count,
        changes: replayer.change_count,
        end_time_ms: replayer.clock.now_ms(),
        final_transform: replayer.viewer.transform(),
        unsettled,
    }
}

//! Time-based animations and the per-frame scheduler that drives them.
//!
//! Two animation kinds exist. An alignment animation eases from a start
//! transform to a fixed target. A velocity animation carries the release
//! velocity of a pan forward with exponential decay; it is recomputed from
//! elapsed time on every frame and an axis that runs into a bound loses its
//! momentum.
//!
//! Frames are requested from the host through [`FrameScheduler`]. The
//! [`AnimationScheduler`] keeps at most one request outstanding and rejects
//! frames from cancelled requests, so a stale callback never moves the view.

use std::cell::RefCell;
use std::rc::Rc;

use crate::constants::VELOCITY_DECAY_RATE;
use crate::samples::Velocity;
use crate::transform::{Transform, TransformModel};

/// Offsets closer than this to the requested value are considered unclamped.
const CLAMP_TOLERANCE: f64 = 1e-9;

/// Standard ease-out cubic curve; `t` is clamped into `[0, 1]`.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Normalized momentum progress for elapsed fraction `f`.
///
/// Exponential decay at [`VELOCITY_DECAY_RATE`], scaled so that `f = 1`
/// yields exactly 1.
fn decay_progress(f: f64) -> f64 {
    let f = f.clamp(0.0, 1.0);
    (1.0 - (-VELOCITY_DECAY_RATE * f).exp()) / (1.0 - (-VELOCITY_DECAY_RATE).exp())
}

/// Which animation is running.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationKind {
    /// Momentum after a pan release. `distance` is the remaining travel
    /// (px) per axis; an axis stopped by a bound has zero distance.
    Velocity { distance: Velocity },
    /// Eased interpolation to a fixed target.
    Alignment,
}

/// Result of advancing an animation by one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStep {
    /// The transform was modified
    pub changed: bool,
    /// The animation reached its end (or can make no further progress)
    pub finished: bool,
}

/// An animation between two transforms over a fixed duration.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub kind: AnimationKind,
    pub start: Transform,
    pub target: Transform,
    pub start_time_ms: f64,
    pub duration_ms: f64,
}

impl Animation {
    /// Ease from `start` to `target` over `duration_ms`.
    pub fn alignment(start: Transform, target: Transform, start_time_ms: f64, duration_ms: f64) -> Self {
        Self {
            kind: AnimationKind::Alignment,
            start,
            target,
            start_time_ms,
            duration_ms: duration_ms.max(0.0),
        }
    }

    /// Carry `velocity` (px/ms) forward from `start`.
    ///
    /// The travel is `velocity * sensitivity * tau` with `tau = duration / k`,
    /// the integral of the decaying velocity. `target` is the bound-clamped
    /// end of that trajectory.
    pub fn velocity(
        start: Transform,
        velocity: Velocity,
        sensitivity: f64,
        start_time_ms: f64,
        duration_ms: f64,
        model: &TransformModel,
    ) -> Self {
        let duration_ms = duration_ms.max(0.0);
        let tau = duration_ms / VELOCITY_DECAY_RATE;
        let distance = velocity.scaled(sensitivity * tau);
        let target = model.clamped(&start.panned(distance.x, distance.y));
        Self {
            kind: AnimationKind::Velocity { distance },
            start,
            target,
            start_time_ms,
            duration_ms,
        }
    }

    pub fn is_velocity(&self) -> bool {
        matches!(self.kind, AnimationKind::Velocity { .. })
    }

    /// Elapsed fraction in `[0, 1]` at `now_ms`.
    ///
    /// Zero-length animations and frames arriving after the duration yield 1,
    /// so a starved frame callback ends the animation on its next frame.
    pub fn fraction(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        let elapsed = now_ms - self.start_time_ms;
        if !elapsed.is_finite() {
            return 1.0;
        }
        (elapsed / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Advance to `now_ms`, writing the new transform into `model`.
    pub fn step(&mut self, now_ms: f64, model: &mut TransformModel) -> FrameStep {
        let fraction = self.fraction(now_ms);
        match self.kind {
            AnimationKind::Alignment => {
                let frame = self.start.lerp(&self.target, ease_out_cubic(fraction));
                let changed = model.set_transform(frame);
                FrameStep {
                    changed,
                    finished: fraction >= 1.0,
                }
            }
            AnimationKind::Velocity { mut distance } => {
                let progress = decay_progress(fraction);
                let requested = self
                    .start
                    .panned(distance.x * progress, distance.y * progress);
                let changed = model.set_transform(requested);
                let actual = model.transform();

                // Hitting an edge kills the momentum on that axis
                if distance.x != 0.0 && (actual.offset_x - requested.offset_x).abs() > CLAMP_TOLERANCE {
                    self.start.offset_x = actual.offset_x;
                    distance.x = 0.0;
                }
                if distance.y != 0.0 && (actual.offset_y - requested.offset_y).abs() > CLAMP_TOLERANCE {
                    self.start.offset_y = actual.offset_y;
                    distance.y = 0.0;
                }
                self.kind = AnimationKind::Velocity { distance };

                let stopped = distance.x == 0.0 && distance.y == 0.0;
                FrameStep {
                    changed,
                    finished: fraction >= 1.0 || stopped,
                }
            }
        }
    }
}

/// Identifier of one frame callback registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub u64);

/// Host hook for per-display-frame callbacks (e.g. `requestAnimationFrame`).
///
/// When a requested frame comes due, the host calls
/// [`Viewer::on_frame`](crate::Viewer::on_frame) with the returned id.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameId;
    fn cancel_frame(&mut self, id: FrameId);
}

/// Keeps at most one frame request outstanding.
#[derive(Debug)]
pub struct AnimationScheduler<F: FrameScheduler> {
    frames: F,
    pending: Option<FrameId>,
}

impl<F: FrameScheduler> AnimationScheduler<F> {
    pub fn new(frames: F) -> Self {
        Self {
            frames,
            pending: None,
        }
    }

    /// Make sure a frame is requested.
    pub fn schedule(&mut self) -> FrameId {
        if let Some(id) = self.pending {
            return id;
        }
        let id = self.frames.request_frame();
        log::trace!("Requested frame {:?}", id);
        self.pending = Some(id);
        id
    }

    /// Cancel the outstanding request, if any.
    pub fn cancel(&mut self) {
        if let Some(id) = self.pending.take() {
            log::trace!("Cancelled frame {:?}", id);
            self.frames.cancel_frame(id);
        }
    }

    /// Claim a delivered frame. Returns false for stale or unknown ids.
    pub fn begin_frame(&mut self, id: FrameId) -> bool {
        if self.pending == Some(id) {
            self.pending = None;
            true
        } else {
            log::trace!("Ignoring stale frame {:?}", id);
            false
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    pub fn frames(&self) -> &F {
        &self.frames
    }
}

#[derive(Debug, Default)]
struct ManualFrames {
    next_id: u64,
    pending: Vec<FrameId>,
    cancelled: usize,
}

/// Frame scheduler whose frames are fired explicitly.
///
/// Used by tests and trace replay together with
/// [`ManualClock`](crate::ManualClock). Clones share state.
#[derive(Debug, Clone, Default)]
pub struct ManualFrameScheduler {
    inner: Rc<RefCell<ManualFrames>>,
}

impl ManualFrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that have neither fired nor been cancelled.
    pub fn pending(&self) -> Vec<FrameId> {
        self.inner.borrow().pending.clone()
    }

    /// Remove and return all outstanding requests, as a frame callback would.
    pub fn take_pending(&self) -> Vec<FrameId> {
        std::mem::take(&mut self.inner.borrow_mut().pending)
    }

    /// Number of requests cancelled so far.
    pub fn cancelled_count(&self) -> usize {
        self.inner.borrow().cancelled
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_frame(&mut self) -> FrameId {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = FrameId(inner.next_id);
        inner.pending.push(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        let mut inner = self.inner.borrow_mut();
        let before = inner.pending.len();
        inner.pending.retain(|pending| *pending != id);
        if inner.pending.len() != before {
            inner.cancelled += 1;
        }
    }
}

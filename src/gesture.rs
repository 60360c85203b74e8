//! Gesture state machine.
//!
//! Tracks which interaction is active and routes intents either straight to
//! the [`TransformModel`] (pan, wheel, pinch) or into an [`Animation`]
//! (momentum, double-click zoom, snap-back). Any new gesture cancels a
//! running animation; responsiveness wins over finishing the animation.

use crate::animation::Animation;
use crate::config::GestureConfig;
use crate::constants::{MIN_PINCH_DISTANCE, MIN_RELEASE_SPEED, SCALE_EPSILON};
use crate::input::Intent;
use crate::samples::PointerSamples;
use crate::transform::{Point, Transform, TransformModel};

/// The active interaction. Exactly one is active at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Panning {
        last_pointer: Point,
        samples: PointerSamples,
    },
    Pinching {
        initial_distance: f64,
        initial_scale: f64,
        focal: Point,
    },
    Animating(Animation),
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    pub fn is_animating(&self) -> bool {
        matches!(self, InteractionState::Animating(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            InteractionState::Idle => "idle",
            InteractionState::Panning { .. } => "panning",
            InteractionState::Pinching { .. } => "pinching",
            InteractionState::Animating(anim) if anim.is_velocity() => "animating(velocity)",
            InteractionState::Animating(_) => "animating(alignment)",
        }
    }
}

/// What the frame scheduler has to do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameCommand {
    /// Nothing to do
    #[default]
    None,
    /// A new animation started; drop any outstanding request and request a frame
    Start,
    /// The running animation needs another frame
    Continue,
    /// The running animation ended or was cancelled
    Stop,
}

/// Effect of handling one intent or frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Outcome {
    /// The transform was modified
    pub changed: bool,
    pub frames: FrameCommand,
}

/// Routes intents and frames according to the current [`InteractionState`].
#[derive(Debug, Clone)]
pub struct GestureMachine {
    state: InteractionState,
    config: GestureConfig,
}

impl GestureMachine {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            state: InteractionState::Idle,
            config,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }

    /// Apply one intent at host time `now_ms`.
    pub fn handle(&mut self, intent: Intent, model: &mut TransformModel, now_ms: f64) -> Outcome {
        let was_animating = self.state.is_animating();
        let before = self.state.name();

        let (changed, started) = match intent {
            Intent::PanStart { position, time_ms } => {
                if matches!(self.state, InteractionState::Idle | InteractionState::Animating(_)) {
                    let mut samples = PointerSamples::default();
                    samples.push(position, time_ms);
                    self.state = InteractionState::Panning {
                        last_pointer: position,
                        samples,
                    };
                }
                (false, false)
            }
            Intent::PanDelta {
                dx,
                dy,
                position,
                time_ms,
            } => match &mut self.state {
                InteractionState::Panning {
                    last_pointer,
                    samples,
                } => {
                    *last_pointer = position;
                    samples.push(position, time_ms);
                    (model.apply_pan(dx, dy), false)
                }
                _ => (false, false),
            },
            Intent::PanEnd { position, time_ms } => self.release_pan(position, time_ms, model, now_ms),
            Intent::Cancel => match self.state {
                InteractionState::Panning { .. } | InteractionState::Pinching { .. } => self.settle(model, now_ms),
                _ => (false, false),
            },
            Intent::Interrupt => {
                self.stop_animation();
                (false, false)
            }
            Intent::ZoomAt { focal, factor } => {
                self.stop_animation();
                let changed = model.apply_zoom(factor, focal);
                if self.state.is_idle() {
                    let (snapped, started) = self.settle(model, now_ms);
                    (changed || snapped, started)
                } else {
                    (changed, false)
                }
            }
            Intent::PinchStart { focal, distance } => {
                if distance.is_finite()
                    && distance >= MIN_PINCH_DISTANCE
                    && !matches!(self.state, InteractionState::Pinching { .. })
                {
                    self.state = InteractionState::Pinching {
                        initial_distance: distance,
                        initial_scale: model.transform().scale,
                        focal,
                    };
                }
                (false, false)
            }
            Intent::PinchDelta { distance_ratio, .. } => match self.state {
                InteractionState::Pinching {
                    initial_scale,
                    focal,
                    ..
                } => {
                    let current = model.transform().scale;
                    let factor = initial_scale * distance_ratio / current;
                    (model.apply_zoom(factor, focal), false)
                }
                _ => (false, false),
            },
            Intent::PinchEnd => match self.state {
                InteractionState::Pinching { .. } => self.settle(model, now_ms),
                _ => (false, false),
            },
            Intent::ToggleZoom { focal } => {
                let scale = model.transform().scale;
                let target_scale = if (scale - 1.0).abs() <= SCALE_EPSILON {
                    self.config.double_click.step
                } else {
                    1.0
                };
                let duration = self.config.double_click.animation_time_ms;
                self.zoom_to(target_scale, focal, duration, model, now_ms)
            }
            Intent::StepZoom { focal } => {
                let target_scale = model.transform().scale * self.config.double_click.step;
                let duration = self.config.double_click.animation_time_ms;
                self.zoom_to(target_scale, focal, duration, model, now_ms)
            }
            Intent::ResetZoom { .. } => {
                let target = model.initial_transform();
                let duration = self.config.double_click.animation_time_ms;
                self.animate_to(target, duration, model, now_ms)
            }
            Intent::ZoomIn | Intent::ZoomOut => {
                let step = self.config.controls.zoom_step;
                let factor = if intent == Intent::ZoomIn { 1.0 + step } else { 1.0 - step };
                let target_scale = model.transform().scale * factor;
                let focal = model.bounds().viewport.center();
                let duration = self.config.controls.animation_time_ms;
                self.zoom_to(target_scale, focal, duration, model, now_ms)
            }
            Intent::Reset => {
                let target = model.initial_transform();
                let duration = self.config.controls.animation_time_ms;
                self.animate_to(target, duration, model, now_ms)
            }
            Intent::Nudge { dx, dy } => {
                if matches!(self.state, InteractionState::Panning { .. } | InteractionState::Pinching { .. }) {
                    (false, false)
                } else {
                    self.stop_animation();
                    let target = model.clamped(&model.transform().panned(dx, dy));
                    (model.set_transform(target), false)
                }
            }
        };

        let after = self.state.name();
        if before != after {
            log::trace!("Gesture state {} -> {} on {:?}", before, after, intent);
        }
        self.outcome(was_animating, changed, started)
    }

    /// Advance the running animation to `now_ms`.
    pub fn tick(&mut self, model: &mut TransformModel, now_ms: f64) -> Outcome {
        let InteractionState::Animating(animation) = &mut self.state else {
            return Outcome::default();
        };

        let step = animation.step(now_ms, model);
        if !step.finished {
            return Outcome {
                changed: step.changed,
                frames: FrameCommand::Continue,
            };
        }

        let was_velocity = animation.is_velocity();
        log::debug!("Animation finished at {:?}", model.transform());
        self.state = InteractionState::Idle;

        // Momentum may end in the overscroll margin
        let (snapped, started) = if was_velocity {
            self.settle(model, now_ms)
        } else {
            (false, false)
        };
        Outcome {
            changed: step.changed || snapped,
            frames: if started { FrameCommand::Continue } else { FrameCommand::None },
        }
    }

    /// Return to `Idle` immediately and clamp the transform strictly into bounds.
    ///
    /// Used when the viewport or content size changes, which can invalidate
    /// both the transform and any animation target.
    pub fn reset(&mut self, model: &mut TransformModel) -> Outcome {
        let was_animating = self.state.is_animating();
        self.state = InteractionState::Idle;
        let changed = model.set_transform(model.clamp_to_bounds());
        self.outcome(was_animating, changed, false)
    }

    /// Animate from the current transform to (the clamped) `target`.
    ///
    /// A non-positive duration applies the target immediately.
    pub fn animate_to(
        &mut self,
        target: Transform,
        duration_ms: f64,
        model: &mut TransformModel,
        now_ms: f64,
    ) -> (bool, bool) {
        self.stop_animation();
        if !target.is_finite() {
            return (false, false);
        }
        let target = model.clamped(&target);
        let start = model.transform();
        if start == target {
            self.state = InteractionState::Idle;
            return (false, false);
        }
        if duration_ms <= 0.0 || !duration_ms.is_finite() {
            self.state = InteractionState::Idle;
            return (model.set_transform(target), false);
        }
        log::debug!("Alignment animation {:?} -> {:?} over {} ms", start, target, duration_ms);
        self.state = InteractionState::Animating(Animation::alignment(start, target, now_ms, duration_ms));
        (false, true)
    }

    /// Animate to `target_scale` (clamped to limits) keeping `focal` fixed.
    pub fn zoom_to(
        &mut self,
        target_scale: f64,
        focal: Point,
        duration_ms: f64,
        model: &mut TransformModel,
        now_ms: f64,
    ) -> (bool, bool) {
        if !target_scale.is_finite() || target_scale <= 0.0 || !focal.is_finite() {
            self.stop_animation();
            return (false, false);
        }
        let current = model.transform();
        let scale = model.limits().clamp_scale(target_scale);
        self.animate_to(current.zoomed_at(scale, focal), duration_ms, model, now_ms)
    }

    /// Build the outcome of a transition.
    pub fn outcome(&self, was_animating: bool, changed: bool, started: bool) -> Outcome {
        let frames = if started {
            FrameCommand::Start
        } else if was_animating && !self.state.is_animating() {
            FrameCommand::Stop
        } else {
            FrameCommand::None
        };
        Outcome { changed, frames }
    }

    fn stop_animation(&mut self) {
        if let InteractionState::Animating(animation) = &self.state {
            log::trace!("Cancelling {:?} animation", animation.kind);
            self.state = InteractionState::Idle;
        }
    }

    fn release_pan(
        &mut self,
        position: Point,
        time_ms: f64,
        model: &mut TransformModel,
        now_ms: f64,
    ) -> (bool, bool) {
        let InteractionState::Panning { samples, .. } = &mut self.state else {
            return (false, false);
        };
        samples.push(position, time_ms);
        let mut velocity = samples.velocity();

        // Samples hold raw pointer positions; a locked axis must not coast
        let panning = &self.config.panning;
        if panning.lock_axis_x {
            velocity.x = 0.0;
        }
        if panning.lock_axis_y {
            velocity.y = 0.0;
        }

        if !self.config.momentum_enabled() || velocity.speed() < MIN_RELEASE_SPEED {
            log::trace!("Pan released at {:.3} px/ms, no momentum", velocity.speed());
            return self.settle(model, now_ms);
        }

        let start = model.transform();
        let momentum = &self.config.velocity_animation;
        let animation = Animation::velocity(
            start,
            velocity,
            momentum.sensitivity,
            now_ms,
            momentum.animation_time_sec * 1000.0,
            model,
        );
        if animation.duration_ms <= 0.0 || animation.target == model.clamped(&start) {
            return self.settle(model, now_ms);
        }
        log::debug!(
            "Velocity animation at ({:.3}, {:.3}) px/ms towards {:?}",
            velocity.x,
            velocity.y,
            animation.target
        );
        self.state = InteractionState::Animating(animation);
        (false, true)
    }

    /// End the current interaction, snapping back into bounds if it left them.
    fn settle(&mut self, model: &mut TransformModel, now_ms: f64) -> (bool, bool) {
        self.state = InteractionState::Idle;
        let current = model.transform();
        let target = model.clamped(&current);
        if target == current {
            return (false, false);
        }

        let alignment = &self.config.alignment_animation;
        let duration = if alignment.disabled {
            0.0
        } else {
            alignment.velocity_alignment_time_sec * 1000.0
        };
        self.animate_to(target, duration, model, now_ms)
    }
}

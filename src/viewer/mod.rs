//! Viewer facade.
//!
//! [`Viewer`] owns the transform and wires the input normalizer, the gesture
//! state machine and the animation scheduler together. The host feeds it raw
//! events and delivered frames; it reads the current transform back or
//! subscribes to be told about every change.

mod controls;

#[cfg(test)]
mod tests;

use lightbox_events::RawEvent;

use crate::animation::{AnimationScheduler, FrameId, FrameScheduler};
use crate::clock::Clock;
use crate::config::{GestureConfig, ViewerConfig};
use crate::gesture::{FrameCommand, GestureMachine, InteractionState, Outcome};
use crate::input::{InputNormalizer, Intent};
use crate::transform::{Bounds, Size, Transform, TransformModel};

/// Handle returned by [`Viewer::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&Transform)>;

/// Interactive pan/zoom engine for one viewport.
pub struct Viewer<F: FrameScheduler, C: Clock> {
    model: TransformModel,
    gesture: GestureConfig,
    normalizer: InputNormalizer,
    machine: GestureMachine,
    scheduler: AnimationScheduler<F>,
    clock: C,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl<F: FrameScheduler, C: Clock> Viewer<F, C> {
    /// Create a viewer at the configured initial transform.
    pub fn new(bounds: Bounds, config: &ViewerConfig, frames: F, clock: C) -> Self {
        let config = config.clone().sanitized();
        let gesture = config.gesture;
        let model = TransformModel::new(bounds, config.limits, gesture.alignment_animation.margin());
        log::debug!(
            "Viewer created: viewport {:?}, content {:?}, transform {:?}",
            bounds.viewport,
            bounds.content,
            model.transform()
        );
        Self {
            model,
            gesture,
            normalizer: InputNormalizer::new(gesture),
            machine: GestureMachine::new(gesture),
            scheduler: AnimationScheduler::new(frames),
            clock,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Current transform for the render path.
    pub fn transform(&self) -> Transform {
        self.model.transform()
    }

    pub fn state(&self) -> &InteractionState {
        self.machine.state()
    }

    pub fn bounds(&self) -> Bounds {
        self.model.bounds()
    }

    pub fn gesture_config(&self) -> &GestureConfig {
        &self.gesture
    }

    pub fn is_animating(&self) -> bool {
        self.machine.state().is_animating()
    }

    pub fn frames(&self) -> &F {
        self.scheduler.frames()
    }

    /// Feed one raw platform event.
    pub fn handle_event(&mut self, event: &RawEvent) {
        if let Some(intent) = self.normalizer.normalize(event) {
            self.handle_intent(intent);
        }
    }

    /// Feed one already normalized intent.
    pub fn handle_intent(&mut self, intent: Intent) {
        let now = self.clock.now_ms();
        let outcome = self.machine.handle(intent, &mut self.model, now);
        self.apply(outcome);
    }

    /// Deliver a frame requested through the [`FrameScheduler`].
    ///
    /// Returns false when the frame belongs to a cancelled request; such a
    /// frame never touches the transform.
    pub fn on_frame(&mut self, id: FrameId) -> bool {
        if !self.scheduler.begin_frame(id) {
            return false;
        }
        let now = self.clock.now_ms();
        let outcome = self.machine.tick(&mut self.model, now);
        self.apply(outcome);
        true
    }

    /// The viewport changed size.
    pub fn resize(&mut self, viewport: Size) {
        let bounds = Bounds::new(viewport, self.model.bounds().content);
        self.set_bounds(bounds);
    }

    /// The content changed size (e.g. a new image was loaded).
    pub fn set_content_size(&mut self, content: Size) {
        let bounds = Bounds::new(self.model.bounds().viewport, content);
        self.set_bounds(bounds);
    }

    /// Register a callback invoked once after every transform change.
    pub fn subscribe(&mut self, listener: impl FnMut(&Transform) + 'static) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn set_bounds(&mut self, bounds: Bounds) {
        log::debug!(
            "Bounds changed: viewport {:?}, content {:?}",
            bounds.viewport,
            bounds.content
        );
        self.normalizer.reset();
        let moved = self.model.set_bounds(bounds);
        let mut outcome = self.machine.reset(&mut self.model);
        outcome.changed |= moved;
        self.apply(outcome);
    }

    /// Run a machine operation that may start an animation.
    fn run(&mut self, op: impl FnOnce(&mut GestureMachine, &mut TransformModel, f64) -> (bool, bool)) {
        let now = self.clock.now_ms();
        let was_animating = self.machine.state().is_animating();
        let (changed, started) = op(&mut self.machine, &mut self.model, now);
        let outcome = self.machine.outcome(was_animating, changed, started);
        self.apply(outcome);
    }

    fn apply(&mut self, outcome: Outcome) {
        match outcome.frames {
            FrameCommand::None => {}
            FrameCommand::Start => {
                self.scheduler.cancel();
                self.scheduler.schedule();
            }
            FrameCommand::Continue => {
                self.scheduler.schedule();
            }
            FrameCommand::Stop => self.scheduler.cancel(),
        }
        if outcome.changed {
            self.notify();
        }
    }

    fn notify(&mut self) {
        let transform = self.model.transform();
        for (_, listener) in &mut self.listeners {
            listener(&transform);
        }
    }
}

impl<F: FrameScheduler, C: Clock> std::fmt::Debug for Viewer<F, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewer")
            .field("transform", &self.model.transform())
            .field("bounds", &self.model.bounds())
            .field("state", &self.machine.state().name())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

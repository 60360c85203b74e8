//! Programmatic controls for host toolbars and APIs.
//!
//! Every control cancels a running animation before it acts.

use crate::animation::FrameScheduler;
use crate::clock::Clock;
use crate::input::Intent;
use crate::transform::{Point, Transform};

use super::Viewer;

impl<F: FrameScheduler, C: Clock> Viewer<F, C> {
    /// Zoom in by `controls.zoom_step` around the viewport centre.
    pub fn zoom_in(&mut self) {
        self.handle_intent(Intent::ZoomIn);
    }

    /// Zoom out by `controls.zoom_step` around the viewport centre.
    pub fn zoom_out(&mut self) {
        self.handle_intent(Intent::ZoomOut);
    }

    /// Animate back to the initial transform.
    pub fn reset_transform(&mut self) {
        self.handle_intent(Intent::Reset);
    }

    /// Centre the content in the viewport, keeping the current scale.
    pub fn center_view(&mut self) {
        let current = self.transform();
        let bounds = self.bounds();
        let target = Transform::new(
            (bounds.viewport.width - bounds.content.width * current.scale) / 2.0,
            (bounds.viewport.height - bounds.content.height * current.scale) / 2.0,
            current.scale,
        );
        self.set_transform(target, true);
    }

    /// Move to `transform`, clamped into limits and bounds.
    pub fn set_transform(&mut self, transform: Transform, animated: bool) {
        let duration = self.animation_time(animated);
        self.run(|machine, model, now| machine.animate_to(transform, duration, model, now));
    }

    /// Zoom to `scale` keeping the viewport point `focal` fixed.
    pub fn zoom_to_point(&mut self, scale: f64, focal: Point, animated: bool) {
        let duration = self.animation_time(animated);
        self.run(|machine, model, now| machine.zoom_to(scale, focal, duration, model, now));
    }

    fn animation_time(&self, animated: bool) -> f64 {
        if animated {
            self.gesture_config().controls.animation_time_ms
        } else {
            0.0
        }
    }
}

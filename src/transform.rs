//! View transform and the model that owns it.
//!
//! A [`Transform`] maps content space (image pixels at scale 1) into viewport
//! space: `viewport = content * scale + offset`. The [`TransformModel`] is the
//! only place a transform is mutated, and every mutation leaves it inside the
//! scale limits and the offset bounds derived from the viewport and content
//! sizes.

use serde::{Deserialize, Serialize};

use crate::config::TransformLimits;

pub use lightbox_events::Point;

/// Pan/zoom transform state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
}

impl Transform {
    /// Create a new transform with the given offset and scale.
    pub fn new(offset_x: f64, offset_y: f64, scale: f64) -> Self {
        Self {
            offset_x,
            offset_y,
            scale,
        }
    }

    /// Create an identity transform (scale=1, no offset).
    pub fn identity() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }

    /// Map a content-space point into viewport space.
    pub fn to_viewport(&self, content: Point) -> Point {
        Point::new(
            content.x * self.scale + self.offset_x,
            content.y * self.scale + self.offset_y,
        )
    }

    /// Map a viewport-space point into content space.
    pub fn to_content(&self, viewport: Point) -> Point {
        Point::new(
            (viewport.x - self.offset_x) / self.scale,
            (viewport.y - self.offset_y) / self.scale,
        )
    }

    /// Calculate the transform at `new_scale` that keeps `focal` fixed.
    ///
    /// The content point under `focal` (viewport space) stays under it:
    /// `new_offset = focal - (focal - old_offset) * (new_scale / old_scale)`.
    pub fn zoomed_at(&self, new_scale: f64, focal: Point) -> Transform {
        let ratio = new_scale / self.scale;
        Transform {
            offset_x: focal.x - (focal.x - self.offset_x) * ratio,
            offset_y: focal.y - (focal.y - self.offset_y) * ratio,
            scale: new_scale,
        }
    }

    /// Apply a pan delta (viewport pixels) to the transform.
    pub fn panned(&self, dx: f64, dy: f64) -> Transform {
        Transform {
            offset_x: self.offset_x + dx,
            offset_y: self.offset_y + dy,
            scale: self.scale,
        }
    }

    /// Interpolate towards `target`; `t = 1` yields `target` exactly.
    pub fn lerp(&self, target: &Transform, t: f64) -> Transform {
        if t >= 1.0 {
            return *target;
        }
        Transform {
            offset_x: self.offset_x + (target.offset_x - self.offset_x) * t,
            offset_y: self.offset_y + (target.offset_y - self.offset_y) * t,
            scale: self.scale + (target.scale - self.scale) * t,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.offset_x.is_finite() && self.offset_y.is_finite() && self.scale.is_finite()
    }

    /// Component-wise comparison within `epsilon`.
    pub fn approx_eq(&self, other: &Transform, epsilon: f64) -> bool {
        (self.offset_x - other.offset_x).abs() <= epsilon
            && (self.offset_y - other.offset_y).abs() <= epsilon
            && (self.scale - other.scale).abs() <= epsilon
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Replace negative or non-finite dimensions with zero.
    pub fn sanitized(self) -> Self {
        let fix = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self::new(fix(self.width), fix(self.height))
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Viewport and content sizes the transform is bounded by.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    /// Visible area in viewport pixels
    pub viewport: Size,
    /// Content size at scale 1
    pub content: Size,
}

impl Bounds {
    pub fn new(viewport: Size, content: Size) -> Self {
        Self {
            viewport: viewport.sanitized(),
            content: content.sanitized(),
        }
    }

    /// Content size that fits entirely inside the viewport, keeping aspect ratio.
    ///
    /// Hosts that want scale 1 to mean "fit to view" pass this as the content size.
    pub fn fit_content(natural: Size, viewport: Size) -> Size {
        let natural = natural.sanitized();
        let viewport = viewport.sanitized();
        if natural.is_empty() || viewport.is_empty() {
            return natural;
        }
        let ratio = (viewport.width / natural.width).min(viewport.height / natural.height);
        Size::new(natural.width * ratio, natural.height * ratio)
    }

    /// Allowed offset range on both axes at `scale`, widened by `margin`.
    pub fn offset_range(&self, scale: f64, margin: (f64, f64)) -> ((f64, f64), (f64, f64)) {
        (
            axis_range(self.viewport.width, self.content.width * scale, margin.0),
            axis_range(self.viewport.height, self.content.height * scale, margin.1),
        )
    }
}

/// Offset range on one axis.
///
/// Content larger than the viewport must cover it; smaller content must stay
/// inside it. `margin` widens the range on both ends (overscroll).
fn axis_range(viewport: f64, scaled_content: f64, margin: f64) -> (f64, f64) {
    let free = viewport - scaled_content;
    if free <= 0.0 {
        (free - margin, margin)
    } else {
        (-margin, free + margin)
    }
}

/// Owner of the current transform.
///
/// All writes go through this type and are clamped: scale into the
/// configured limits, offsets into the bounds widened by the overscroll
/// margin. [`TransformModel::clamp_to_bounds`] gives the strict (margin-free)
/// nearest valid transform.
#[derive(Debug, Clone)]
pub struct TransformModel {
    transform: Transform,
    bounds: Bounds,
    limits: TransformLimits,
    /// Overscroll allowed while interacting, per axis
    margin: (f64, f64),
}

impl TransformModel {
    /// Create a model at the initial transform of `limits`.
    pub fn new(bounds: Bounds, limits: TransformLimits, margin: (f64, f64)) -> Self {
        let mut model = Self {
            transform: Transform::identity(),
            bounds,
            limits: limits.sanitized(),
            margin: (margin.0.max(0.0), margin.1.max(0.0)),
        };
        model.transform = model.initial_transform();
        model
    }

    /// Current transform.
    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn limits(&self) -> &TransformLimits {
        &self.limits
    }

    /// Transform the viewer starts at (and returns to on reset).
    pub fn initial_transform(&self) -> Transform {
        self.clamped(&Transform::new(
            self.limits.initial_position_x,
            self.limits.initial_position_y,
            self.limits.initial_scale,
        ))
    }

    /// Shift the offset by a viewport-space delta.
    ///
    /// Returns whether the transform changed; panning into a bound is a no-op.
    pub fn apply_pan(&mut self, dx: f64, dy: f64) -> bool {
        if !dx.is_finite() || !dy.is_finite() {
            return false;
        }
        let next = self.clamp_with_margin(&self.transform.panned(dx, dy));
        self.replace(next)
    }

    /// Multiply the scale by `factor`, keeping `focal` fixed.
    ///
    /// Non-positive or non-finite factors and zooms past a scale limit are
    /// no-ops. A zoom that only partially fits is applied up to the limit.
    ///
    /// Bounds take precedence over the focal point: when the zoomed transform
    /// would leave the bounds (a zoom-out near an edge), it is shifted back
    /// inside and the focal point moves with it.
    pub fn apply_zoom(&mut self, factor: f64, focal: Point) -> bool {
        if !(factor.is_finite() && factor > 0.0) || !focal.is_finite() {
            return false;
        }
        let current = self.transform;
        let new_scale = self.limits.clamp_scale(current.scale * factor);
        if (new_scale - current.scale).abs() <= f64::EPSILON * current.scale {
            return false;
        }
        let zoomed = current.zoomed_at(new_scale, focal);
        let next = self.clamp_with_margin(&zoomed);
        self.replace(next)
    }

    /// Assign a transform, clamping it if it violates the limits or bounds.
    pub fn set_transform(&mut self, transform: Transform) -> bool {
        if !transform.is_finite() {
            return false;
        }
        let next = self.clamp_with_margin(&transform);
        self.replace(next)
    }

    /// Nearest transform to the current one that lies strictly inside the bounds.
    pub fn clamp_to_bounds(&self) -> Transform {
        self.clamped(&self.transform)
    }

    /// Nearest transform to `transform` that lies strictly inside the bounds.
    pub fn clamped(&self, transform: &Transform) -> Transform {
        self.clamp_within(transform, (0.0, 0.0))
    }

    /// Whether `transform` lies strictly inside the bounds.
    pub fn is_within_bounds(&self, transform: &Transform) -> bool {
        self.clamped(transform) == *transform
    }

    /// Replace the bounds; the current transform is clamped to the new ones.
    pub fn set_bounds(&mut self, bounds: Bounds) -> bool {
        self.bounds = bounds;
        let next = self.clamp_to_bounds();
        self.replace(next)
    }

    fn clamp_with_margin(&self, transform: &Transform) -> Transform {
        self.clamp_within(transform, self.margin)
    }

    fn clamp_within(&self, transform: &Transform, margin: (f64, f64)) -> Transform {
        let scale = self.limits.clamp_scale(transform.scale);
        let ((min_x, max_x), (min_y, max_y)) = self.bounds.offset_range(scale, margin);
        Transform {
            offset_x: transform.offset_x.clamp(min_x, max_x),
            offset_y: transform.offset_y.clamp(min_y, max_y),
            scale,
        }
    }

    fn replace(&mut self, next: Transform) -> bool {
        if next == self.transform {
            return false;
        }
        self.transform = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn photo_bounds() -> Bounds {
        Bounds::new(Size::new(800.0, 600.0), Size::new(4000.0, 3000.0))
    }

    fn model() -> TransformModel {
        TransformModel::new(photo_bounds(), TransformLimits::default(), (0.0, 0.0))
    }

    #[test]
    fn test_identity_transform() {
        let t = Transform::identity();
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.offset_x, 0.0);
        assert_eq!(t.offset_y, 0.0);
    }

    #[test]
    fn test_zoomed_at_preserves_focal_point() {
        let t = Transform::new(-50.0, -30.0, 1.5);
        let focal = Point::new(150.0, 120.0);
        let before = t.to_content(focal);

        let zoomed = t.zoomed_at(3.0, focal);
        let after = zoomed.to_viewport(before);

        assert!(approx_eq(after.x, focal.x));
        assert!(approx_eq(after.y, focal.y));
    }

    #[test]
    fn test_content_viewport_conversion() {
        let t = Transform::new(10.0, 20.0, 2.0);
        let p = t.to_viewport(Point::new(5.0, 5.0));
        assert_eq!(p, Point::new(20.0, 30.0));
        assert_eq!(t.to_content(p), Point::new(5.0, 5.0));
    }

    #[test]
    fn test_lerp_reaches_target_exactly() {
        let start = Transform::new(0.3, 0.7, 1.1);
        let target = Transform::new(-200.0, -200.0, 2.0);

        assert_eq!(start.lerp(&target, 1.0), target);
        assert_eq!(start.lerp(&target, 0.0), start);
    }

    #[test]
    fn test_offset_range_large_and_small_content() {
        let bounds = photo_bounds();
        let ((min_x, max_x), (min_y, max_y)) = bounds.offset_range(1.0, (0.0, 0.0));
        assert_eq!((min_x, max_x), (-3200.0, 0.0));
        assert_eq!((min_y, max_y), (-2400.0, 0.0));

        let small = Bounds::new(Size::new(800.0, 600.0), Size::new(400.0, 300.0));
        let ((min_x, max_x), _) = small.offset_range(1.0, (10.0, 0.0));
        assert_eq!((min_x, max_x), (-10.0, 410.0));
    }

    #[test]
    fn test_fit_content_keeps_aspect() {
        let fitted = Bounds::fit_content(Size::new(4000.0, 3000.0), Size::new(800.0, 800.0));
        assert!(approx_eq(fitted.width, 800.0));
        assert!(approx_eq(fitted.height, 600.0));
    }

    #[test]
    fn test_pan_clamps_at_bounds() {
        let mut model = model();

        assert!(!model.apply_pan(50.0, 50.0), "already at the top-left bound");
        assert!(model.apply_pan(-100.0, -40.0));
        assert_eq!(model.transform(), Transform::new(-100.0, -40.0, 1.0));

        model.apply_pan(-10_000.0, -10_000.0);
        assert_eq!(model.transform(), Transform::new(-3200.0, -2400.0, 1.0));
    }

    #[test]
    fn test_pan_ignores_non_finite_delta() {
        let mut model = model();
        assert!(!model.apply_pan(f64::NAN, 1.0));
        assert_eq!(model.transform(), Transform::identity());
    }

    #[test]
    fn test_zoom_keeps_focal_fixed() {
        let mut model = model();
        let focal = Point::new(400.0, 300.0);

        assert!(model.apply_zoom(1.1, focal));
        let t = model.transform();
        assert!(approx_eq(t.scale, 1.1));
        assert!(approx_eq(t.offset_x, -40.0));
        assert!(approx_eq(t.offset_y, -30.0));
    }

    #[test]
    fn test_zoom_past_limits_is_noop() {
        let mut model = model();
        assert!(!model.apply_zoom(0.5, Point::new(10.0, 10.0)), "already at min scale");

        model.set_transform(Transform::new(0.0, 0.0, 8.0));
        assert!(!model.apply_zoom(2.0, Point::new(10.0, 10.0)), "already at max scale");
        assert_eq!(model.transform().scale, 8.0);
    }

    #[test]
    fn test_zoom_partially_clamped_keeps_focal() {
        let mut model = model();
        model.set_transform(Transform::new(-100.0, -100.0, 7.5));
        let focal = Point::new(200.0, 150.0);
        let content = model.transform().to_content(focal);

        assert!(model.apply_zoom(1.5, focal));
        let t = model.transform();
        assert_eq!(t.scale, 8.0);
        let back = t.to_viewport(content);
        assert!(approx_eq(back.x, focal.x));
        assert!(approx_eq(back.y, focal.y));
    }

    #[test]
    fn test_zoom_rejects_invalid_factor() {
        let mut model = model();
        assert!(!model.apply_zoom(0.0, Point::ORIGIN));
        assert!(!model.apply_zoom(-2.0, Point::ORIGIN));
        assert!(!model.apply_zoom(f64::INFINITY, Point::ORIGIN));
        assert_eq!(model.transform(), Transform::identity());
    }

    #[test]
    fn test_set_transform_clamps() {
        let mut model = model();
        model.set_transform(Transform::new(500.0, -99_999.0, 20.0));
        let t = model.transform();
        assert_eq!(t.scale, 8.0);
        assert_eq!(t.offset_x, 0.0);
        assert_eq!(t.offset_y, 600.0 - 3000.0 * 8.0);
    }

    #[test]
    fn test_clamp_to_bounds_is_idempotent() {
        let mut model = TransformModel::new(photo_bounds(), TransformLimits::default(), (50.0, 50.0));
        model.apply_pan(40.0, 40.0);
        assert_eq!(model.transform(), Transform::new(40.0, 40.0, 1.0), "overscroll allowed");

        let once = model.clamp_to_bounds();
        assert_eq!(once, Transform::identity());
        assert_eq!(model.clamped(&once), once);
    }

    #[test]
    fn test_set_bounds_reclamps() {
        let mut model = model();
        model.apply_pan(-3000.0, 0.0);

        let wider = Bounds::new(Size::new(1600.0, 600.0), Size::new(4000.0, 3000.0));
        assert!(model.set_bounds(wider));
        assert_eq!(model.transform().offset_x, -2400.0);
    }

    #[test]
    fn test_zero_sized_viewport_is_stable() {
        let bounds = Bounds::new(Size::new(0.0, 0.0), Size::new(4000.0, 3000.0));
        let mut model = TransformModel::new(bounds, TransformLimits::default(), (0.0, 0.0));
        model.apply_pan(-10.0, -10.0);
        model.apply_zoom(2.0, Point::ORIGIN);
        assert!(model.transform().is_finite());
    }
}

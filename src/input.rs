//! Input normalizer: raw platform events to gesture intents.
//!
//! The normalizer absorbs platform quirks (wheel delta modes, touchpad
//! detection, touch identifiers, double-tap synthesis) and applies the
//! enable/disable switches of the gesture configuration. Everything after it
//! only sees [`Intent`]s.

use lightbox_events::{DeltaMode, Key, MouseButton, PointerKind, RawEvent, TouchPoint, WheelSource};

use crate::config::{DoubleClickMode, GestureConfig};
use crate::constants::{
    DOUBLE_TAP_INTERVAL_MS, DOUBLE_TAP_SLOP, MAX_PINCH_WHEEL_FACTOR, MIN_PINCH_DISTANCE,
    MIN_PINCH_WHEEL_FACTOR, PINCH_WHEEL_DELTA_UNIT, TAP_MAX_DURATION_MS, TAP_MAX_MOVEMENT,
};
use crate::transform::Point;

/// Pixels per wheel line in `DeltaMode::Line`
const LINE_HEIGHT_PX: f64 = 16.0;

/// Pixels per wheel page in `DeltaMode::Page`
const PAGE_HEIGHT_PX: f64 = 400.0;

/// A platform-independent user action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// A pan drag started.
    PanStart { position: Point, time_ms: f64 },
    /// The pan drag moved by a viewport-space delta.
    PanDelta {
        dx: f64,
        dy: f64,
        position: Point,
        time_ms: f64,
    },
    /// The pan drag was released.
    PanEnd { position: Point, time_ms: f64 },
    /// The active gesture was aborted by the platform.
    Cancel,
    /// A press, wheel or touch arrived that starts no gesture. It still
    /// stops a running animation.
    Interrupt,
    /// Zoom by `factor` around `focal` (wheel, pinch emulation).
    ZoomAt { focal: Point, factor: f64 },
    /// Two fingers came down.
    PinchStart { focal: Point, distance: f64 },
    /// Finger distance changed; `distance_ratio` is relative to the start distance.
    PinchDelta { distance_ratio: f64, focal: Point },
    /// A pinch finger lifted.
    PinchEnd,
    /// Double-click in toggle mode.
    ToggleZoom { focal: Point },
    /// Double-click in zoom mode.
    StepZoom { focal: Point },
    /// Double-click in reset mode.
    ResetZoom { focal: Point },
    /// Keyboard zoom in around the viewport centre.
    ZoomIn,
    /// Keyboard zoom out around the viewport centre.
    ZoomOut,
    /// Keyboard reset to the initial transform.
    Reset,
    /// Keyboard pan by a fixed step.
    Nudge { dx: f64, dy: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    id: u64,
    last: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pinch {
    ids: (u64, u64),
    initial_distance: f64,
}

/// Turns single-finger taps into double-tap detections.
#[derive(Debug, Clone, Copy, Default)]
struct TapTracker {
    down: Option<(Point, f64)>,
    last_tap: Option<(Point, f64)>,
}

impl TapTracker {
    fn begin(&mut self, position: Point, time_ms: f64) {
        self.down = Some((position, time_ms));
    }

    fn moved(&mut self, position: Point) {
        if let Some((start, _)) = self.down {
            if start.distance(position) > TAP_MAX_MOVEMENT {
                self.down = None;
            }
        }
    }

    fn cancel(&mut self) {
        self.down = None;
        self.last_tap = None;
    }

    /// Finish a touch; returns true if it completes a double tap.
    fn finish(&mut self, position: Point, time_ms: f64) -> bool {
        let Some((start, start_ms)) = self.down.take() else {
            return false;
        };
        let is_tap = time_ms - start_ms <= TAP_MAX_DURATION_MS && start.distance(position) <= TAP_MAX_MOVEMENT;
        if !is_tap {
            self.last_tap = None;
            return false;
        }

        if let Some((prev, prev_ms)) = self.last_tap.take() {
            if time_ms - prev_ms <= DOUBLE_TAP_INTERVAL_MS && prev.distance(position) <= DOUBLE_TAP_SLOP {
                return true;
            }
        }
        self.last_tap = Some((position, time_ms));
        false
    }
}

/// Stateful converter from [`RawEvent`]s to [`Intent`]s.
#[derive(Debug, Clone)]
pub struct InputNormalizer {
    config: GestureConfig,
    /// Active mouse/pen drag
    drag: Option<Drag>,
    /// Active single-finger drag
    touch_drag: Option<Drag>,
    pinch: Option<Pinch>,
    taps: TapTracker,
}

impl InputNormalizer {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            drag: None,
            touch_drag: None,
            pinch: None,
            taps: TapTracker::default(),
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }

    /// Forget every tracked pointer and finger.
    pub fn reset(&mut self) {
        self.drag = None;
        self.touch_drag = None;
        self.pinch = None;
        self.taps.cancel();
    }

    /// Convert one raw event into at most one intent.
    pub fn normalize(&mut self, event: &RawEvent) -> Option<Intent> {
        match event {
            RawEvent::PointerDown {
                pointer_id,
                kind,
                button,
                position,
                time_ms,
            } => self.pointer_down(*pointer_id, *kind, *button, *position, *time_ms),
            RawEvent::PointerMove {
                pointer_id,
                position,
                time_ms,
            } => {
                let drag = self.drag.as_mut().filter(|d| d.id == *pointer_id)?;
                let (dx, dy) = (position.x - drag.last.x, position.y - drag.last.y);
                drag.last = *position;
                self.pan_delta(dx, dy, *position, *time_ms)
            }
            RawEvent::PointerUp {
                pointer_id,
                position,
                time_ms,
            } => {
                self.drag.filter(|d| d.id == *pointer_id)?;
                self.drag = None;
                Some(Intent::PanEnd {
                    position: *position,
                    time_ms: *time_ms,
                })
            }
            RawEvent::PointerCancel { pointer_id, .. } => {
                self.drag.filter(|d| d.id == *pointer_id)?;
                self.drag = None;
                Some(Intent::Cancel)
            }
            RawEvent::Wheel {
                delta_x,
                delta_y,
                delta_mode,
                modifiers,
                source,
                position,
                ..
            } => {
                let zoom = if modifiers.ctrl {
                    self.pinch_wheel(*delta_y, *delta_mode, *position)
                } else {
                    self.wheel(*delta_x, *delta_y, *delta_mode, *source, *position)
                };
                zoom.or(Some(Intent::Interrupt))
            }
            RawEvent::TouchStart { touches, time_ms } => self.touch_start(touches, *time_ms),
            RawEvent::TouchMove { touches, time_ms } => self.touch_move(touches, *time_ms),
            RawEvent::TouchEnd {
                touches,
                released,
                time_ms,
            } => self.touch_end(touches, *released, *time_ms),
            RawEvent::DoubleClick { position, .. } => self.double_click(*position),
            RawEvent::KeyDown { key, .. } => self.key_down(*key),
        }
    }

    fn pointer_down(
        &mut self,
        pointer_id: u64,
        kind: PointerKind,
        button: MouseButton,
        position: Point,
        time_ms: f64,
    ) -> Option<Intent> {
        // Touch arrives through the touch events
        if kind == PointerKind::Touch || self.drag.is_some() {
            return None;
        }
        let panning = &self.config.panning;
        let allowed = match button {
            MouseButton::Left => panning.allow_left_click_pan,
            MouseButton::Middle => panning.allow_middle_click_pan,
            MouseButton::Right => panning.allow_right_click_pan,
            MouseButton::Other(_) => false,
        };
        if panning.disabled || !allowed || !position.is_finite() {
            return Some(Intent::Interrupt);
        }
        self.drag = Some(Drag {
            id: pointer_id,
            last: position,
        });
        Some(Intent::PanStart { position, time_ms })
    }

    fn pan_delta(&self, dx: f64, dy: f64, position: Point, time_ms: f64) -> Option<Intent> {
        let (dx, dy) = self.lock_axes(dx, dy);
        if !dx.is_finite() || !dy.is_finite() {
            return None;
        }
        // Zero deltas still feed the velocity window
        Some(Intent::PanDelta {
            dx,
            dy,
            position,
            time_ms,
        })
    }

    fn lock_axes(&self, dx: f64, dy: f64) -> (f64, f64) {
        let panning = &self.config.panning;
        (
            if panning.lock_axis_x { 0.0 } else { dx },
            if panning.lock_axis_y { 0.0 } else { dy },
        )
    }

    fn wheel(
        &self,
        delta_x: f64,
        delta_y: f64,
        delta_mode: DeltaMode,
        source: WheelSource,
        focal: Point,
    ) -> Option<Intent> {
        let wheel = &self.config.wheel;
        if wheel.wheel_disabled {
            return None;
        }
        if wheel.touch_pad_disabled && is_touchpad(delta_x, delta_y, delta_mode, source) {
            return None;
        }
        if delta_y == 0.0 || !delta_y.is_finite() || !focal.is_finite() {
            return None;
        }
        // Wheel up (negative delta) zooms in, one step per event
        let factor = 1.0 - wheel.step * delta_y.signum();
        Some(Intent::ZoomAt { focal, factor })
    }

    fn pinch_wheel(&self, delta_y: f64, delta_mode: DeltaMode, focal: Point) -> Option<Intent> {
        let pinch = &self.config.pinch;
        if pinch.disabled || !focal.is_finite() {
            return None;
        }
        let delta_px = delta_y * delta_unit(delta_mode);
        let factor = (1.0 - delta_px * pinch.step / PINCH_WHEEL_DELTA_UNIT)
            .clamp(MIN_PINCH_WHEEL_FACTOR, MAX_PINCH_WHEEL_FACTOR);
        if !factor.is_finite() || factor == 1.0 {
            return None;
        }
        Some(Intent::ZoomAt { focal, factor })
    }

    fn touch_start(&mut self, touches: &[TouchPoint], time_ms: f64) -> Option<Intent> {
        match touches {
            [] => None,
            [single] => {
                self.taps.begin(single.position, time_ms);
                if self.pinch.is_some() {
                    return None;
                }
                if self.config.panning.disabled {
                    return Some(Intent::Interrupt);
                }
                self.touch_drag = Some(Drag {
                    id: single.id,
                    last: single.position,
                });
                Some(Intent::PanStart {
                    position: single.position,
                    time_ms,
                })
            }
            [first, second, ..] => {
                self.taps.cancel();
                if self.pinch.is_some() {
                    return None;
                }
                if self.config.pinch.disabled {
                    return Some(Intent::Interrupt);
                }
                let distance = first.position.distance(second.position);
                if distance.is_nan() || distance < MIN_PINCH_DISTANCE {
                    log::trace!("Ignoring degenerate pinch of {} px", distance);
                    return Some(Intent::Interrupt);
                }
                self.touch_drag = None;
                self.pinch = Some(Pinch {
                    ids: (first.id, second.id),
                    initial_distance: distance,
                });
                Some(Intent::PinchStart {
                    focal: first.position.midpoint(second.position),
                    distance,
                })
            }
        }
    }

    fn touch_move(&mut self, touches: &[TouchPoint], time_ms: f64) -> Option<Intent> {
        if let [single] = touches {
            self.taps.moved(single.position);
        }

        if let Some(pinch) = self.pinch {
            let a = find_touch(touches, pinch.ids.0)?;
            let b = find_touch(touches, pinch.ids.1)?;
            let distance_ratio = a.distance(b) / pinch.initial_distance;
            if !distance_ratio.is_finite() || distance_ratio <= 0.0 {
                return None;
            }
            return Some(Intent::PinchDelta {
                distance_ratio,
                focal: a.midpoint(b),
            });
        }

        let drag = self.touch_drag.as_mut()?;
        let position = find_touch(touches, drag.id)?;
        let (dx, dy) = (position.x - drag.last.x, position.y - drag.last.y);
        drag.last = position;
        self.pan_delta(dx, dy, position, time_ms)
    }

    fn touch_end(&mut self, touches: &[TouchPoint], released: Option<Point>, time_ms: f64) -> Option<Intent> {
        if let Some(pinch) = self.pinch {
            let still_down = find_touch(touches, pinch.ids.0).is_some() && find_touch(touches, pinch.ids.1).is_some();
            if still_down {
                return None;
            }
            self.pinch = None;
            return Some(Intent::PinchEnd);
        }

        let drag = self.touch_drag?;
        if find_touch(touches, drag.id).is_some() {
            return None;
        }
        self.touch_drag = None;
        let position = released.unwrap_or(drag.last);

        if touches.is_empty() && self.taps.finish(position, time_ms) {
            if let Some(intent) = self.double_click(position) {
                return Some(intent);
            }
        }
        Some(Intent::PanEnd { position, time_ms })
    }

    fn double_click(&self, focal: Point) -> Option<Intent> {
        let double_click = &self.config.double_click;
        if double_click.disabled || !focal.is_finite() {
            return None;
        }
        Some(match double_click.mode {
            DoubleClickMode::Toggle => Intent::ToggleZoom { focal },
            DoubleClickMode::Zoom => Intent::StepZoom { focal },
            DoubleClickMode::Reset => Intent::ResetZoom { focal },
        })
    }

    fn key_down(&self, key: Key) -> Option<Intent> {
        let controls = &self.config.controls;
        if controls.keyboard_disabled {
            return None;
        }
        let step = controls.pan_step;
        let nudge = |dx: f64, dy: f64| {
            if self.config.panning.disabled {
                return None;
            }
            let (dx, dy) = self.lock_axes(dx, dy);
            Some(Intent::Nudge { dx, dy })
        };
        match key {
            Key::Char('+') | Key::Char('=') => Some(Intent::ZoomIn),
            Key::Char('-') => Some(Intent::ZoomOut),
            Key::Char('0') => Some(Intent::Reset),
            Key::Up => nudge(0.0, step),
            Key::Down => nudge(0.0, -step),
            Key::Left => nudge(step, 0.0),
            Key::Right => nudge(-step, 0.0),
            _ => None,
        }
    }
}

fn find_touch(touches: &[TouchPoint], id: u64) -> Option<Point> {
    touches.iter().find(|t| t.id == id).map(|t| t.position)
}

fn delta_unit(mode: DeltaMode) -> f64 {
    match mode {
        DeltaMode::Pixel => 1.0,
        DeltaMode::Line => LINE_HEIGHT_PX,
        DeltaMode::Page => PAGE_HEIGHT_PX,
    }
}

/// Whether a wheel event comes from a touchpad.
///
/// Hosts that know the device say so; otherwise pixel-mode events with a
/// fractional or horizontal component are taken as touchpad scrolling.
/// This is a best-effort guess: a mouse that reports whole pixel deltas
/// looks the same as a coarse touchpad, and both count as a mouse here.
fn is_touchpad(delta_x: f64, delta_y: f64, delta_mode: DeltaMode, source: WheelSource) -> bool {
    match source {
        WheelSource::Touchpad => true,
        WheelSource::Mouse => false,
        WheelSource::Unknown => {
            delta_mode == DeltaMode::Pixel && (delta_x != 0.0 || delta_y.fract() != 0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lightbox_events::Modifiers;

    fn normalizer() -> InputNormalizer {
        InputNormalizer::new(GestureConfig::default())
    }

    fn wheel(delta_y: f64, source: WheelSource, ctrl: bool) -> RawEvent {
        RawEvent::Wheel {
            delta_x: 0.0,
            delta_y,
            delta_mode: DeltaMode::Pixel,
            modifiers: Modifiers {
                ctrl,
                ..Modifiers::default()
            },
            source,
            position: Point::new(400.0, 300.0),
            time_ms: 0.0,
        }
    }

    fn pointer_down(x: f64, y: f64, button: MouseButton) -> RawEvent {
        RawEvent::PointerDown {
            pointer_id: 1,
            kind: PointerKind::Mouse,
            button,
            position: Point::new(x, y),
            time_ms: 0.0,
        }
    }

    fn pointer_move(x: f64, y: f64, time_ms: f64) -> RawEvent {
        RawEvent::PointerMove {
            pointer_id: 1,
            position: Point::new(x, y),
            time_ms,
        }
    }

    fn touches(points: &[(u64, f64, f64)]) -> Vec<TouchPoint> {
        points.iter().map(|&(id, x, y)| TouchPoint::new(id, x, y)).collect()
    }

    #[test]
    fn test_wheel_zoom_in_and_out() {
        let mut input = normalizer();
        let focal = Point::new(400.0, 300.0);

        assert_eq!(
            input.normalize(&wheel(-100.0, WheelSource::Mouse, false)),
            Some(Intent::ZoomAt { focal, factor: 1.1 })
        );
        assert_eq!(
            input.normalize(&wheel(100.0, WheelSource::Mouse, false)),
            Some(Intent::ZoomAt { focal, factor: 0.9 })
        );
        assert_eq!(input.normalize(&wheel(0.0, WheelSource::Mouse, false)), Some(Intent::Interrupt));
    }

    #[test]
    fn test_wheel_disabled() {
        let mut config = GestureConfig::default();
        config.wheel.wheel_disabled = true;
        let mut input = InputNormalizer::new(config);

        assert_eq!(input.normalize(&wheel(-100.0, WheelSource::Mouse, false)), Some(Intent::Interrupt));
        assert_eq!(input.normalize(&wheel(-100.0, WheelSource::Touchpad, false)), Some(Intent::Interrupt));
    }

    #[test]
    fn test_touchpad_disabled_keeps_mouse_wheel() {
        let mut config = GestureConfig::default();
        config.wheel.touch_pad_disabled = true;
        let mut input = InputNormalizer::new(config);

        let interrupt = Some(Intent::Interrupt);
        assert_eq!(input.normalize(&wheel(-4.5, WheelSource::Touchpad, false)), interrupt);
        assert_eq!(input.normalize(&wheel(-4.5, WheelSource::Unknown, false)), interrupt, "fractional pixel delta");
        assert!(matches!(
            input.normalize(&wheel(-100.0, WheelSource::Unknown, false)),
            Some(Intent::ZoomAt { .. })
        ));
        assert!(matches!(
            input.normalize(&wheel(-100.0, WheelSource::Mouse, false)),
            Some(Intent::ZoomAt { .. })
        ));
    }

    #[test]
    fn test_touchpad_guessed_from_horizontal_delta() {
        let mut config = GestureConfig::default();
        config.wheel.touch_pad_disabled = true;
        let mut input = InputNormalizer::new(config);

        let diagonal = |delta_mode| RawEvent::Wheel {
            delta_x: 3.0,
            delta_y: -10.0,
            delta_mode,
            modifiers: Modifiers::default(),
            source: WheelSource::Unknown,
            position: Point::new(400.0, 300.0),
            time_ms: 0.0,
        };
        assert_eq!(input.normalize(&diagonal(DeltaMode::Pixel)), Some(Intent::Interrupt));
        // Line mode is a notched wheel even with a horizontal component
        assert!(matches!(
            input.normalize(&diagonal(DeltaMode::Line)),
            Some(Intent::ZoomAt { .. })
        ));
        assert!(!is_touchpad(0.0, -10.0, DeltaMode::Pixel, WheelSource::Unknown));
        assert!(is_touchpad(-1.0, -10.0, DeltaMode::Pixel, WheelSource::Unknown));
        assert!(!is_touchpad(-1.0, -10.0, DeltaMode::Pixel, WheelSource::Mouse));
    }

    #[test]
    fn test_ctrl_wheel_is_pinch() {
        let mut input = normalizer();
        let intent = input.normalize(&wheel(-10.0, WheelSource::Touchpad, true));
        match intent {
            Some(Intent::ZoomAt { factor, .. }) => assert!((factor - 1.05).abs() < 1e-12),
            other => panic!("expected zoom, got {:?}", other),
        }

        let mut config = GestureConfig::default();
        config.pinch.disabled = true;
        let mut input = InputNormalizer::new(config);
        assert_eq!(input.normalize(&wheel(-10.0, WheelSource::Touchpad, true)), Some(Intent::Interrupt));
    }

    #[test]
    fn test_ctrl_wheel_factor_is_bounded() {
        let mut input = normalizer();
        match input.normalize(&wheel(100_000.0, WheelSource::Touchpad, true)) {
            Some(Intent::ZoomAt { factor, .. }) => assert_eq!(factor, MIN_PINCH_WHEEL_FACTOR),
            other => panic!("expected zoom, got {:?}", other),
        }
    }

    #[test]
    fn test_mouse_drag_produces_pan_intents() {
        let mut input = normalizer();

        assert!(matches!(
            input.normalize(&pointer_down(10.0, 10.0, MouseButton::Left)),
            Some(Intent::PanStart { .. })
        ));
        assert_eq!(
            input.normalize(&pointer_move(15.0, 7.0, 16.0)),
            Some(Intent::PanDelta {
                dx: 5.0,
                dy: -3.0,
                position: Point::new(15.0, 7.0),
                time_ms: 16.0
            })
        );
        assert!(matches!(
            input.normalize(&RawEvent::PointerUp {
                pointer_id: 1,
                position: Point::new(15.0, 7.0),
                time_ms: 20.0
            }),
            Some(Intent::PanEnd { .. })
        ));
        assert_eq!(input.normalize(&pointer_move(30.0, 30.0, 40.0)), None, "drag ended");
    }

    #[test]
    fn test_panning_disabled_suppresses_drag() {
        let mut config = GestureConfig::default();
        config.panning.disabled = true;
        let mut input = InputNormalizer::new(config);

        assert_eq!(input.normalize(&pointer_down(10.0, 10.0, MouseButton::Left)), Some(Intent::Interrupt));
        assert_eq!(input.normalize(&pointer_move(20.0, 20.0, 16.0)), None);
    }

    #[test]
    fn test_right_button_does_not_pan_by_default() {
        let mut input = normalizer();
        assert_eq!(input.normalize(&pointer_down(10.0, 10.0, MouseButton::Right)), Some(Intent::Interrupt));
        assert!(input.normalize(&pointer_down(10.0, 10.0, MouseButton::Middle)).is_some());
    }

    #[test]
    fn test_locked_axis_is_zeroed() {
        let mut config = GestureConfig::default();
        config.panning.lock_axis_y = true;
        let mut input = InputNormalizer::new(config);

        input.normalize(&pointer_down(0.0, 0.0, MouseButton::Left));
        match input.normalize(&pointer_move(8.0, 6.0, 16.0)) {
            Some(Intent::PanDelta { dx, dy, .. }) => {
                assert_eq!(dx, 8.0);
                assert_eq!(dy, 0.0);
            }
            other => panic!("expected pan delta, got {:?}", other),
        }
    }

    #[test]
    fn test_touch_pointer_events_ignored() {
        let mut input = normalizer();
        let event = RawEvent::PointerDown {
            pointer_id: 7,
            kind: PointerKind::Touch,
            button: MouseButton::Left,
            position: Point::new(1.0, 1.0),
            time_ms: 0.0,
        };
        assert_eq!(input.normalize(&event), None);
    }

    #[test]
    fn test_two_finger_pinch() {
        let mut input = normalizer();

        let start = input.normalize(&RawEvent::TouchStart {
            touches: touches(&[(1, 100.0, 100.0), (2, 200.0, 100.0)]),
            time_ms: 0.0,
        });
        assert_eq!(
            start,
            Some(Intent::PinchStart {
                focal: Point::new(150.0, 100.0),
                distance: 100.0
            })
        );

        let moved = input.normalize(&RawEvent::TouchMove {
            touches: touches(&[(1, 50.0, 100.0), (2, 250.0, 100.0)]),
            time_ms: 16.0,
        });
        assert_eq!(
            moved,
            Some(Intent::PinchDelta {
                distance_ratio: 2.0,
                focal: Point::new(150.0, 100.0)
            })
        );

        let ended = input.normalize(&RawEvent::TouchEnd {
            touches: touches(&[(2, 250.0, 100.0)]),
            released: None,
            time_ms: 30.0,
        });
        assert_eq!(ended, Some(Intent::PinchEnd));
    }

    #[test]
    fn test_degenerate_pinch_ignored() {
        let mut input = normalizer();
        let start = input.normalize(&RawEvent::TouchStart {
            touches: touches(&[(1, 100.0, 100.0), (2, 100.0, 100.0)]),
            time_ms: 0.0,
        });
        assert_eq!(start, Some(Intent::Interrupt));

        let moved = input.normalize(&RawEvent::TouchMove {
            touches: touches(&[(1, 50.0, 100.0), (2, 250.0, 100.0)]),
            time_ms: 16.0,
        });
        assert_eq!(moved, None);
    }

    #[test]
    fn test_pinch_disabled() {
        let mut config = GestureConfig::default();
        config.pinch.disabled = true;
        let mut input = InputNormalizer::new(config);

        let start = input.normalize(&RawEvent::TouchStart {
            touches: touches(&[(1, 100.0, 100.0), (2, 200.0, 100.0)]),
            time_ms: 0.0,
        });
        assert_eq!(start, Some(Intent::Interrupt));
    }

    #[test]
    fn test_double_click_modes() {
        let focal = Point::new(200.0, 200.0);
        let event = RawEvent::DoubleClick { position: focal, time_ms: 0.0 };

        let mut input = normalizer();
        assert_eq!(input.normalize(&event), Some(Intent::ToggleZoom { focal }));

        let mut config = GestureConfig::default();
        config.double_click.mode = DoubleClickMode::Zoom;
        input.set_config(config);
        assert_eq!(input.normalize(&event), Some(Intent::StepZoom { focal }));

        config.double_click.mode = DoubleClickMode::Reset;
        input.set_config(config);
        assert_eq!(input.normalize(&event), Some(Intent::ResetZoom { focal }));

        config.double_click.disabled = true;
        input.set_config(config);
        assert_eq!(input.normalize(&event), None);
    }

    #[test]
    fn test_double_tap_becomes_double_click() {
        let mut input = normalizer();
        let tap = |input: &mut InputNormalizer, t: f64| {
            input.normalize(&RawEvent::TouchStart {
                touches: touches(&[(1, 200.0, 200.0)]),
                time_ms: t,
            });
            input.normalize(&RawEvent::TouchEnd {
                touches: Vec::new(),
                released: Some(Point::new(201.0, 200.0)),
                time_ms: t + 60.0,
            })
        };

        assert!(matches!(tap(&mut input, 0.0), Some(Intent::PanEnd { .. })));
        assert_eq!(
            tap(&mut input, 200.0),
            Some(Intent::ToggleZoom {
                focal: Point::new(201.0, 200.0)
            })
        );
        assert!(
            matches!(tap(&mut input, 400.0), Some(Intent::PanEnd { .. })),
            "third tap starts a new sequence"
        );
    }

    #[test]
    fn test_slow_taps_are_not_double_tap() {
        let mut input = normalizer();
        for t in [0.0, 1000.0] {
            input.normalize(&RawEvent::TouchStart {
                touches: touches(&[(1, 200.0, 200.0)]),
                time_ms: t,
            });
            let end = input.normalize(&RawEvent::TouchEnd {
                touches: Vec::new(),
                released: None,
                time_ms: t + 50.0,
            });
            assert!(matches!(end, Some(Intent::PanEnd { .. })));
        }
    }

    #[test]
    fn test_keyboard_shortcuts() {
        let mut input = normalizer();
        let key = |key| RawEvent::KeyDown {
            key,
            modifiers: Modifiers::default(),
            time_ms: 0.0,
        };

        assert_eq!(input.normalize(&key(Key::Char('+'))), Some(Intent::ZoomIn));
        assert_eq!(input.normalize(&key(Key::Char('-'))), Some(Intent::ZoomOut));
        assert_eq!(input.normalize(&key(Key::Char('0'))), Some(Intent::Reset));
        assert_eq!(input.normalize(&key(Key::Left)), Some(Intent::Nudge { dx: 40.0, dy: 0.0 }));
        assert_eq!(input.normalize(&key(Key::Down)), Some(Intent::Nudge { dx: 0.0, dy: -40.0 }));
        assert_eq!(input.normalize(&key(Key::Enter)), None);

        let mut config = GestureConfig::default();
        config.controls.keyboard_disabled = true;
        input.set_config(config);
        assert_eq!(input.normalize(&key(Key::Char('+'))), None);
    }
}

use crate::Point;
use serde::{Deserialize, Serialize};

/// Events a host platform delivers to the viewer.
///
/// Every event carries the host's timestamp in milliseconds. Timestamps only
/// need to be monotonic within one session; their origin is irrelevant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawEvent {
    /// Pointer (mouse or pen) button pressed.
    PointerDown {
        #[serde(default)]
        pointer_id: u64,
        #[serde(default)]
        kind: PointerKind,
        #[serde(default)]
        button: MouseButton,
        position: Point,
        time_ms: f64,
    },
    /// Pointer moved.
    PointerMove {
        #[serde(default)]
        pointer_id: u64,
        position: Point,
        time_ms: f64,
    },
    /// Pointer button released.
    PointerUp {
        #[serde(default)]
        pointer_id: u64,
        position: Point,
        time_ms: f64,
    },
    /// Pointer capture lost (window blur, system gesture, ...).
    PointerCancel {
        #[serde(default)]
        pointer_id: u64,
        time_ms: f64,
    },
    /// Mouse wheel or touchpad scroll.
    Wheel {
        #[serde(default)]
        delta_x: f64,
        delta_y: f64,
        #[serde(default)]
        delta_mode: DeltaMode,
        #[serde(default)]
        modifiers: Modifiers,
        #[serde(default)]
        source: WheelSource,
        position: Point,
        time_ms: f64,
    },
    /// A finger touched down. `touches` lists every finger currently down.
    TouchStart { touches: Vec<TouchPoint>, time_ms: f64 },
    /// One or more fingers moved. `touches` lists every finger currently down.
    TouchMove { touches: Vec<TouchPoint>, time_ms: f64 },
    /// A finger lifted. `touches` lists the fingers still down.
    TouchEnd {
        touches: Vec<TouchPoint>,
        /// Where the lifted finger left the surface, when the host knows it.
        #[serde(default)]
        released: Option<Point>,
        time_ms: f64,
    },
    /// Native double-click.
    DoubleClick { position: Point, time_ms: f64 },
    /// Keyboard key pressed while the viewer has focus.
    KeyDown {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
        time_ms: f64,
    },
}

impl RawEvent {
    /// Host timestamp of the event.
    pub fn time_ms(&self) -> f64 {
        match self {
            RawEvent::PointerDown { time_ms, .. }
            | RawEvent::PointerMove { time_ms, .. }
            | RawEvent::PointerUp { time_ms, .. }
            | RawEvent::PointerCancel { time_ms, .. }
            | RawEvent::Wheel { time_ms, .. }
            | RawEvent::TouchStart { time_ms, .. }
            | RawEvent::TouchMove { time_ms, .. }
            | RawEvent::TouchEnd { time_ms, .. }
            | RawEvent::DoubleClick { time_ms, .. }
            | RawEvent::KeyDown { time_ms, .. } => *time_ms,
        }
    }
}

/// Device that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    #[default]
    Mouse,
    Pen,
    /// Touch reported through the pointer API. Touch input is expected through
    /// the dedicated touch events, so these are ignored by the viewer.
    Touch,
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Unit of a wheel delta, as in the DOM `deltaMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

/// What the host knows about the device behind a wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelSource {
    Mouse,
    Touchpad,
    #[default]
    Unknown,
}

/// A single finger on a touch surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: u64,
    pub position: Point,
}

impl TouchPoint {
    pub fn new(id: u64, x: f64, y: f64) -> Self {
        Self {
            id,
            position: Point::new(x, y),
        }
    }
}

/// Keyboard keys (simplified set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,
    Space,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

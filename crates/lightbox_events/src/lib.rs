//! lightbox_events - Raw input event shapes for the lightbox viewer
//!
//! These types mirror what a host platform (browser, winit, a test harness)
//! reports. They carry no gesture logic; the viewer's input normalizer turns
//! them into intents.

mod event;
mod point;

pub use event::{
    DeltaMode, Key, Modifiers, MouseButton, PointerKind, RawEvent, TouchPoint, WheelSource,
};
pub use point::Point;

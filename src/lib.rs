//! Lightbox - pan, zoom and pinch engine for interactive image viewers
//!
//! Raw platform events go through the input normalizer into intents, the
//! gesture state machine applies them to a bounded transform, and animations
//! (momentum, double-click zoom, snap-back) advance on host display frames.
//! Nothing here renders; hosts read the transform back or subscribe to it.

mod animation;
mod clock;
mod config;
mod constants;
mod gesture;
mod input;
mod samples;
mod trace;
mod transform;
mod viewer;

pub use animation::{
    ease_out_cubic, Animation, AnimationKind, AnimationScheduler, FrameId, FrameScheduler, FrameStep,
    ManualFrameScheduler,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    AlignmentAnimationConfig, ConfigError, ControlsConfig, DoubleClickConfig, DoubleClickMode, GestureConfig,
    LogLevel, PanningConfig, PinchConfig, TransformLimits, VelocityAnimationConfig, ViewerConfig, WheelConfig,
    CONFIG_VERSION,
};
pub use gesture::{FrameCommand, GestureMachine, InteractionState, Outcome};
pub use input::{InputNormalizer, Intent};
pub use samples::{PointerSample, PointerSamples, Velocity};
pub use trace::{replay, ReplayChange, ReplaySummary, Trace, TraceError, TraceEvent};
pub use transform::{Bounds, Point, Size, Transform, TransformModel};
pub use viewer::{ListenerId, Viewer};

pub use lightbox_events as events;

//! Global constants for the lightbox viewer engine

// =============================================================================
// Scale limits
// =============================================================================

/// Default lower scale bound
pub const DEFAULT_MIN_SCALE: f64 = 1.0;

/// Default upper scale bound
pub const DEFAULT_MAX_SCALE: f64 = 8.0;

/// Two scales closer than this are considered equal
pub const SCALE_EPSILON: f64 = 1e-6;

// =============================================================================
// Velocity estimation
// =============================================================================

/// Number of pointer samples kept for release-velocity estimation
pub const VELOCITY_SAMPLE_CAPACITY: usize = 5;

/// Samples older than this (relative to the release) do not contribute
pub const VELOCITY_SAMPLE_MAX_AGE_MS: f64 = 100.0;

/// Release speeds below this (px/ms) start no momentum animation
pub const MIN_RELEASE_SPEED: f64 = 0.05;

/// Decay rate of the momentum curve over the configured duration
pub const VELOCITY_DECAY_RATE: f64 = 5.0;

// =============================================================================
// Wheel and pinch
// =============================================================================

/// Delta (in pixels) of a ctrl+wheel pinch event that maps to `pinch.step` of zoom
pub const PINCH_WHEEL_DELTA_UNIT: f64 = 100.0;

/// Smallest per-event zoom factor produced by a pinch emulation event
pub const MIN_PINCH_WHEEL_FACTOR: f64 = 0.5;

/// Largest per-event zoom factor produced by a pinch emulation event
pub const MAX_PINCH_WHEEL_FACTOR: f64 = 2.0;

/// Pinches starting with fingers closer than this (px) are ignored
pub const MIN_PINCH_DISTANCE: f64 = 1.0;

// =============================================================================
// Tap detection
// =============================================================================

/// Longest touch that still counts as a tap
pub const TAP_MAX_DURATION_MS: f64 = 250.0;

/// Largest finger travel that still counts as a tap
pub const TAP_MAX_MOVEMENT: f64 = 10.0;

/// Longest gap between two taps of a double tap
pub const DOUBLE_TAP_INTERVAL_MS: f64 = 300.0;

/// Largest distance between two taps of a double tap
pub const DOUBLE_TAP_SLOP: f64 = 24.0;

//! Gesture configuration and configuration file support.
//!
//! Every option group deserializes with per-field defaults, so a partial JSON
//! object (or struct update syntax in Rust) overrides only the fields it names.
//! Invalid values are never rejected: [`GestureConfig::sanitized`] and
//! [`TransformLimits::sanitized`] replace them with safe defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE};

/// Log level setting for the replay tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Mouse wheel zoom options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    /// Zoom change per wheel notch (`factor = 1 ± step`)
    pub step: f64,
    /// Ignore every wheel event
    pub wheel_disabled: bool,
    /// Ignore wheel events coming from a touchpad
    pub touch_pad_disabled: bool,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            step: 0.1,
            wheel_disabled: false,
            touch_pad_disabled: false,
        }
    }
}

/// Pinch zoom options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinchConfig {
    /// Sensitivity of ctrl+wheel pinch emulation
    pub step: f64,
    pub disabled: bool,
}

impl Default for PinchConfig {
    fn default() -> Self {
        Self {
            step: 0.5,
            disabled: false,
        }
    }
}

/// What a double-click does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoubleClickMode {
    /// Flip between scale 1 and `step`
    #[default]
    Toggle,
    /// Always zoom in by `step`
    Zoom,
    /// Always return to the initial transform
    Reset,
}

/// Double-click / double-tap options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoubleClickConfig {
    pub step: f64,
    pub disabled: bool,
    pub mode: DoubleClickMode,
    pub animation_time_ms: f64,
}

impl Default for DoubleClickConfig {
    fn default() -> Self {
        Self {
            step: 2.0,
            disabled: false,
            mode: DoubleClickMode::Toggle,
            animation_time_ms: 200.0,
        }
    }
}

/// Drag panning options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanningConfig {
    pub disabled: bool,
    /// Skip the momentum animation after a fast release
    pub velocity_disabled: bool,
    /// Keep the horizontal offset fixed while panning
    pub lock_axis_x: bool,
    /// Keep the vertical offset fixed while panning
    pub lock_axis_y: bool,
    pub allow_left_click_pan: bool,
    pub allow_middle_click_pan: bool,
    pub allow_right_click_pan: bool,
}

impl Default for PanningConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            velocity_disabled: false,
            lock_axis_x: false,
            lock_axis_y: false,
            allow_left_click_pan: true,
            allow_middle_click_pan: true,
            allow_right_click_pan: false,
        }
    }
}

/// Snap-back animation options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentAnimationConfig {
    /// Snap back immediately instead of animating
    pub disabled: bool,
    /// Horizontal overscroll (px) allowed while panning
    pub size_x: f64,
    /// Vertical overscroll (px) allowed while panning
    pub size_y: f64,
    pub velocity_alignment_time_sec: f64,
}

impl Default for AlignmentAnimationConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            size_x: 0.0,
            size_y: 0.0,
            velocity_alignment_time_sec: 0.2,
        }
    }
}

impl AlignmentAnimationConfig {
    /// Overscroll margin per axis.
    pub fn margin(&self) -> (f64, f64) {
        (self.size_x, self.size_y)
    }
}

/// Momentum animation options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VelocityAnimationConfig {
    pub disabled: bool,
    /// Multiplier applied to the release velocity
    pub sensitivity: f64,
    pub animation_time_sec: f64,
}

impl Default for VelocityAnimationConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            sensitivity: 1.0,
            animation_time_sec: 0.2,
        }
    }
}

/// Keyboard shortcuts and programmatic zoom/pan controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub keyboard_disabled: bool,
    /// Zoom change of one zoom-in/zoom-out (`factor = 1 ± zoom_step`)
    pub zoom_step: f64,
    /// Pan distance (px) of one arrow key press
    pub pan_step: f64,
    pub animation_time_ms: f64,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            keyboard_disabled: false,
            zoom_step: 0.5,
            pan_step: 40.0,
            animation_time_ms: 200.0,
        }
    }
}

/// Complete gesture configuration of a viewer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub wheel: WheelConfig,
    pub pinch: PinchConfig,
    pub double_click: DoubleClickConfig,
    pub panning: PanningConfig,
    pub alignment_animation: AlignmentAnimationConfig,
    pub velocity_animation: VelocityAnimationConfig,
    pub controls: ControlsConfig,
}

impl GestureConfig {
    /// Return a copy with every invalid value replaced by its default.
    pub fn sanitized(mut self) -> Self {
        let defaults = GestureConfig::default();

        self.wheel.step = valid_or(
            "wheel.step",
            self.wheel.step,
            |v| v > 0.0 && v < 1.0,
            defaults.wheel.step,
        );
        self.pinch.step = valid_or("pinch.step", self.pinch.step, |v| v >= 0.0, defaults.pinch.step);
        self.double_click.step = valid_or(
            "double_click.step",
            self.double_click.step,
            |v| v > 0.0,
            defaults.double_click.step,
        );
        self.double_click.animation_time_ms = valid_or(
            "double_click.animation_time_ms",
            self.double_click.animation_time_ms,
            |v| v >= 0.0,
            defaults.double_click.animation_time_ms,
        );
        self.alignment_animation.size_x = valid_or(
            "alignment_animation.size_x",
            self.alignment_animation.size_x,
            |v| v >= 0.0,
            defaults.alignment_animation.size_x,
        );
        self.alignment_animation.size_y = valid_or(
            "alignment_animation.size_y",
            self.alignment_animation.size_y,
            |v| v >= 0.0,
            defaults.alignment_animation.size_y,
        );
        self.alignment_animation.velocity_alignment_time_sec = valid_or(
            "alignment_animation.velocity_alignment_time_sec",
            self.alignment_animation.velocity_alignment_time_sec,
            |v| v >= 0.0,
            defaults.alignment_animation.velocity_alignment_time_sec,
        );
        self.velocity_animation.sensitivity = valid_or(
            "velocity_animation.sensitivity",
            self.velocity_animation.sensitivity,
            |v| v >= 0.0,
            defaults.velocity_animation.sensitivity,
        );
        self.velocity_animation.animation_time_sec = valid_or(
            "velocity_animation.animation_time_sec",
            self.velocity_animation.animation_time_sec,
            |v| v >= 0.0,
            defaults.velocity_animation.animation_time_sec,
        );
        self.controls.zoom_step = valid_or(
            "controls.zoom_step",
            self.controls.zoom_step,
            |v| v > 0.0 && v < 1.0,
            defaults.controls.zoom_step,
        );
        self.controls.pan_step = valid_or(
            "controls.pan_step",
            self.controls.pan_step,
            |v| v >= 0.0,
            defaults.controls.pan_step,
        );
        self.controls.animation_time_ms = valid_or(
            "controls.animation_time_ms",
            self.controls.animation_time_ms,
            |v| v >= 0.0,
            defaults.controls.animation_time_ms,
        );

        self
    }

    /// Whether a fast pan release may start a momentum animation.
    pub fn momentum_enabled(&self) -> bool {
        !self.panning.velocity_disabled && !self.velocity_animation.disabled
    }
}

/// Scale limits and the initial transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformLimits {
    pub min_scale: f64,
    pub max_scale: f64,
    pub initial_scale: f64,
    pub initial_position_x: f64,
    pub initial_position_y: f64,
}

impl Default for TransformLimits {
    fn default() -> Self {
        Self {
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            initial_scale: 1.0,
            initial_position_x: 0.0,
            initial_position_y: 0.0,
        }
    }
}

impl TransformLimits {
    /// Return a copy with a usable scale range and initial transform.
    ///
    /// Non-positive scales fall back to defaults and a reversed range is swapped.
    pub fn sanitized(mut self) -> Self {
        let positive = |v: f64| v > 0.0;
        self.min_scale = valid_or("limits.min_scale", self.min_scale, positive, DEFAULT_MIN_SCALE);
        self.max_scale = valid_or("limits.max_scale", self.max_scale, positive, DEFAULT_MAX_SCALE);
        if self.min_scale > self.max_scale {
            log::warn!(
                "limits.min_scale {} is above limits.max_scale {}, swapping",
                self.min_scale,
                self.max_scale
            );
            std::mem::swap(&mut self.min_scale, &mut self.max_scale);
        }
        self.initial_scale = valid_or("limits.initial_scale", self.initial_scale, positive, 1.0)
            .clamp(self.min_scale, self.max_scale);
        self.initial_position_x =
            valid_or("limits.initial_position_x", self.initial_position_x, |_| true, 0.0);
        self.initial_position_y =
            valid_or("limits.initial_position_y", self.initial_position_y, |_| true, 0.0);
        self
    }

    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.min_scale, self.max_scale)
    }
}

/// Keep `value` if it is finite and passes `valid`, otherwise use `default`.
fn valid_or(name: &str, value: f64, valid: impl Fn(f64) -> bool, default: f64) -> f64 {
    if value.is_finite() && valid(value) {
        value
    } else {
        log::warn!("Invalid {} = {}, using {}", name, value, default);
        default
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Viewer configuration as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Version of the configuration file format
    pub version: u32,

    #[serde(default)]
    pub gesture: GestureConfig,

    #[serde(default)]
    pub limits: TransformLimits,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

impl ViewerConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            gesture: GestureConfig::default(),
            limits: TransformLimits::default(),
            log_level: LogLevel::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    ///
    /// Missing fields take their defaults; invalid values are sanitized.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config.sanitized())
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Return a copy with both gesture options and limits sanitized.
    pub fn sanitized(mut self) -> Self {
        self.gesture = self.gesture.sanitized();
        self.limits = self.limits.sanitized();
        self
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "lightbox-config.json"
    }

    /// Get the default config file path.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("lightbox").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("lightbox")
                    .join(Self::default_filename())
            })
        }
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to `path`, creating parent directories if needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = GestureConfig::default();
        assert_eq!(config.wheel.step, 0.1);
        assert_eq!(config.pinch.step, 0.5);
        assert_eq!(config.double_click.step, 2.0);
        assert_eq!(config.double_click.mode, DoubleClickMode::Toggle);
        assert_eq!(config.double_click.animation_time_ms, 200.0);
        assert_eq!(config.alignment_animation.velocity_alignment_time_sec, 0.2);
        assert_eq!(config.alignment_animation.margin(), (0.0, 0.0));
        assert_eq!(config.velocity_animation.sensitivity, 1.0);
        assert_eq!(config.velocity_animation.animation_time_sec, 0.2);
    }

    #[test]
    fn test_partial_json_merges_over_defaults() {
        let json = r#"{
            "version": 1,
            "gesture": {
                "wheel": { "step": 0.25 },
                "double_click": { "mode": "zoom" }
            }
        }"#;
        let config = ViewerConfig::from_json(json).unwrap();

        assert_eq!(config.gesture.wheel.step, 0.25);
        assert!(!config.gesture.wheel.wheel_disabled);
        assert_eq!(config.gesture.double_click.mode, DoubleClickMode::Zoom);
        assert_eq!(config.gesture.double_click.step, 2.0);
        assert_eq!(config.gesture.pinch, PinchConfig::default());
        assert_eq!(config.limits, TransformLimits::default());
    }

    #[test]
    fn test_sanitize_replaces_invalid_values() {
        let mut config = GestureConfig::default();
        config.wheel.step = -0.3;
        config.double_click.step = f64::NAN;
        config.velocity_animation.sensitivity = -1.0;
        config.alignment_animation.size_x = -5.0;
        config.alignment_animation.size_y = 12.0;

        let config = config.sanitized();
        assert_eq!(config.wheel.step, 0.1);
        assert_eq!(config.double_click.step, 2.0);
        assert_eq!(config.velocity_animation.sensitivity, 1.0);
        assert_eq!(config.alignment_animation.size_x, 0.0);
        assert_eq!(config.alignment_animation.size_y, 12.0);
    }

    #[test]
    fn test_limits_swap_reversed_range() {
        let limits = TransformLimits {
            min_scale: 10.0,
            max_scale: 2.0,
            initial_scale: 20.0,
            ..TransformLimits::default()
        }
        .sanitized();

        assert_eq!(limits.min_scale, 2.0);
        assert_eq!(limits.max_scale, 10.0);
        assert_eq!(limits.initial_scale, 10.0);
    }

    #[test]
    fn test_limits_reject_non_positive_scale() {
        let limits = TransformLimits {
            min_scale: 0.0,
            max_scale: f64::INFINITY,
            ..TransformLimits::default()
        }
        .sanitized();

        assert_eq!(limits.min_scale, DEFAULT_MIN_SCALE);
        assert_eq!(limits.max_scale, DEFAULT_MAX_SCALE);
    }

    #[test]
    fn test_version_too_new() {
        let json = r#"{ "version": 99 }"#;
        let err = ViewerConfig::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::VersionTooNew {
                file_version: 99,
                supported_version: CONFIG_VERSION
            }
        ));
    }

    #[test]
    fn test_load_errors() {
        let err = ViewerConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));

        let err = ViewerConfig::load(Path::new("/nonexistent/lightbox-config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
        assert!(err.to_string().starts_with("I/O error"));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = ViewerConfig::new();
        config.gesture.panning.lock_axis_y = true;
        config.log_level = LogLevel::Debug;

        let json = config.to_json().unwrap();
        let parsed = ViewerConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("lightbox-config-test-{}", std::process::id()));
        let path = dir.join(ViewerConfig::default_filename());

        let mut config = ViewerConfig::new();
        config.gesture.wheel.touch_pad_disabled = true;
        config.save(&path).unwrap();

        let loaded = ViewerConfig::load(&path).unwrap();
        assert!(loaded.gesture.wheel.touch_pad_disabled);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_momentum_enabled() {
        let mut config = GestureConfig::default();
        assert!(config.momentum_enabled());
        config.velocity_animation.disabled = true;
        assert!(!config.momentum_enabled());
    }
}

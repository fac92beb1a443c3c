//! Animation error types
//!
//! Invariant violations (double attach, operating on a missing player) panic.
//! These types cover the inputs a caller may reasonably want to validate:
//! keyframes built from external data and settings files.

use thiserror::Error;

/// Keyframe curve construction errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// A curve needs at least one keyframe
    #[error("Curve has no keyframes")]
    Empty,

    /// Keyframe times must be finite and non-negative
    #[error("Invalid keyframe time: {0}")]
    InvalidTime(f64),

    /// Keyframe times must be strictly increasing
    #[error("Keyframe at {time}s does not follow the keyframe at {previous}s")]
    NonMonotonicKeyframe { time: f64, previous: f64 },
}

/// Settings loading errors
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The settings document is not valid TOML for [`crate::AnimationSettings`]
    #[error("Failed to parse animation settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range
    #[error("Invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Any error produced by the animation crate
#[derive(Error, Debug)]
pub enum MotiveError {
    #[error(transparent)]
    Curve(#[from] CurveError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, MotiveError>;

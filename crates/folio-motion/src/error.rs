//! Result and error types for folio-motion.

use crate::surface::SurfaceId;
use crate::tween::TweenId;
use thiserror::Error;

/// Result type for folio-motion operations
pub type MotionResult<T> = Result<T, MotionError>;

/// Errors that can occur in folio-motion
#[derive(Debug, Error)]
pub enum MotionError {
    /// Easing name is not in the registry
    #[error("Unknown easing curve: {name}")]
    UnknownEasing {
        /// Name that failed to resolve
        name: String,
    },

    /// Tween request without any property
    #[error("Tween requires at least one property")]
    EmptyProperties,

    /// Duration is zero, negative or not finite
    #[error("Invalid duration {duration_ms}ms: must be positive and finite")]
    InvalidDuration {
        /// Offending duration in milliseconds
        duration_ms: f64,
    },

    /// Stagger delay is negative or not finite
    #[error("Invalid stagger delay {delay_ms}ms: must be zero or positive")]
    InvalidDelay {
        /// Offending delay in milliseconds
        delay_ms: f64,
    },

    /// Property already leased by another live tween
    #[error("Property '{property}' on surface {surface} is held by tween {holder}")]
    LeaseConflict {
        /// Surface being animated
        surface: SurfaceId,
        /// Contended property
        property: String,
        /// Tween currently holding the lease
        holder: TweenId,
    },

    /// Root margin string could not be parsed
    #[error("Invalid root margin: {margin}")]
    InvalidMargin {
        /// Margin as given
        margin: String,
    },

    /// Visibility threshold outside 0..=1
    #[error("Invalid threshold {threshold}: must be within 0..=1")]
    InvalidThreshold {
        /// Offending threshold
        threshold: f64,
    },

    /// Preference store failure
    #[error("Preference error: {message}")]
    Preference {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl MotionError {
    /// Create an unknown easing error
    #[must_use]
    pub fn unknown_easing(name: impl Into<String>) -> Self {
        Self::UnknownEasing { name: name.into() }
    }

    /// Create a preference error
    #[must_use]
    pub fn preference(message: impl Into<String>) -> Self {
        Self::Preference {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

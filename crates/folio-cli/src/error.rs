//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Invalid argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// Contact form input failed validation
    #[error("Validation failed: {count} field(s) invalid")]
    Validation {
        /// Number of failing fields
        count: usize,
    },

    /// Tweens were still running when the frame budget ran out
    #[error("Simulation still running after {frames} frames")]
    Simulation {
        /// Frames rendered
        frames: usize,
    },

    /// Observed keyframes strayed from the expected curve
    #[error("Easing verification failed: {easing} deviates by {max_deviation:.6}")]
    Verification {
        /// Expected curve name
        easing: String,
        /// Largest deviation seen
        max_deviation: f64,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Motion library error
    #[error("{0}")]
    Motion(#[from] folio_motion::MotionError),
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a validation error
    #[must_use]
    pub const fn validation(count: usize) -> Self {
        Self::Validation { count }
    }

    /// Create a simulation error
    #[must_use]
    pub const fn simulation(frames: usize) -> Self {
        Self::Simulation { frames }
    }

    /// Create an easing verification error
    #[must_use]
    pub fn verification(easing: impl Into<String>, max_deviation: f64) -> Self {
        Self::Verification {
            easing: easing.into(),
            max_deviation,
        }
    }
}

//! Engine defaults, loadable from YAML or JSON.

use crate::easing::Easing;
use crate::error::{MotionError, MotionResult};
use crate::tween::{ConflictPolicy, TweenOptions};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Defaults applied to requests that leave options unset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct EngineConfig {
    /// Duration when a request gives none
    pub default_duration_ms: f64,
    /// Curve when a request gives none
    pub default_easing: Easing,
    /// What to do when a property is already being animated
    pub conflict_policy: ConflictPolicy,
    /// Delay between staggered starts
    pub stagger_delay_ms: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: 1000.0,
            default_easing: Easing::EaseOutCubic,
            conflict_policy: ConflictPolicy::Replace,
            stagger_delay_ms: 100.0,
        }
    }
}

impl EngineConfig {
    /// Set the default duration
    #[must_use]
    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.default_duration_ms = duration_ms;
        self
    }

    /// Set the default easing
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.default_easing = easing;
        self
    }

    /// Set the conflict policy
    #[must_use]
    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    /// Set the stagger delay
    #[must_use]
    pub fn with_stagger_delay(mut self, delay_ms: f64) -> Self {
        self.stagger_delay_ms = delay_ms;
        self
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> MotionResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> MotionResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file, choosing the format by extension.
    ///
    /// `.json` is read as JSON; anything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> MotionResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };
        tracing::debug!(path = %path.display(), ?config, "loaded engine config");
        Ok(config)
    }

    /// Check that durations and delays are usable
    pub fn validate(&self) -> MotionResult<()> {
        if !(self.default_duration_ms.is_finite() && self.default_duration_ms > 0.0) {
            return Err(MotionError::InvalidDuration {
                duration_ms: self.default_duration_ms,
            });
        }
        if !(self.stagger_delay_ms.is_finite() && self.stagger_delay_ms >= 0.0) {
            return Err(MotionError::InvalidDelay {
                delay_ms: self.stagger_delay_ms,
            });
        }
        Ok(())
    }

    /// Options carrying these defaults
    #[must_use]
    pub fn tween_options(&self) -> TweenOptions {
        TweenOptions::default()
            .with_duration(self.default_duration_ms)
            .with_easing(self.default_easing)
            .with_conflict(self.conflict_policy)
    }
}

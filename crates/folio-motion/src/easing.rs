//! Easing curve registry and curve verification.
//!
//! The registry is closed: every curve is a variant of [`Easing`] and
//! resolves from its camelCase name (`"easeOutCubic"`). Curves map a
//! normalized progress in `[0, 1]` to an eased progress with `f(0) == 0`
//! and `f(1) == 1`; the elastic family overshoots in between.
//!
//! [`sample_easing`] and [`verify_easing`] compare observed keyframes
//! against a curve, which is how rendered tweens are checked.

use crate::error::{MotionError, MotionResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Period constant for `easeInElastic` / `easeOutElastic`
const C4: f64 = (2.0 * PI) / 3.0;
/// Period constant for `easeInOutElastic`
const C5: f64 = (2.0 * PI) / 4.5;

/// Named easing curves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    /// Constant speed
    Linear,
    /// Quadratic ease-in
    EaseInQuad,
    /// Quadratic ease-out
    EaseOutQuad,
    /// Quadratic ease-in-out
    EaseInOutQuad,
    /// Cubic ease-in
    EaseInCubic,
    /// Cubic ease-out
    #[default]
    EaseOutCubic,
    /// Cubic ease-in-out
    EaseInOutCubic,
    /// Quartic ease-in
    EaseInQuart,
    /// Quartic ease-out
    EaseOutQuart,
    /// Quartic ease-in-out
    EaseInOutQuart,
    /// Elastic ease-in (undershoots below 0)
    EaseInElastic,
    /// Elastic ease-out (overshoots above 1)
    EaseOutElastic,
    /// Elastic ease-in-out
    EaseInOutElastic,
}

impl Easing {
    /// Every registered curve, in registry order.
    pub const ALL: [Self; 13] = [
        Self::Linear,
        Self::EaseInQuad,
        Self::EaseOutQuad,
        Self::EaseInOutQuad,
        Self::EaseInCubic,
        Self::EaseOutCubic,
        Self::EaseInOutCubic,
        Self::EaseInQuart,
        Self::EaseOutQuart,
        Self::EaseInOutQuart,
        Self::EaseInElastic,
        Self::EaseOutElastic,
        Self::EaseInOutElastic,
    ];

    /// Registry name of the curve.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseInQuad => "easeInQuad",
            Self::EaseOutQuad => "easeOutQuad",
            Self::EaseInOutQuad => "easeInOutQuad",
            Self::EaseInCubic => "easeInCubic",
            Self::EaseOutCubic => "easeOutCubic",
            Self::EaseInOutCubic => "easeInOutCubic",
            Self::EaseInQuart => "easeInQuart",
            Self::EaseOutQuart => "easeOutQuart",
            Self::EaseInOutQuart => "easeInOutQuart",
            Self::EaseInElastic => "easeInElastic",
            Self::EaseOutElastic => "easeOutElastic",
            Self::EaseInOutElastic => "easeInOutElastic",
        }
    }

    /// Resolve a curve by registry name.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::UnknownEasing`] if the name is not registered.
    pub fn from_name(name: &str) -> MotionResult<Self> {
        Self::ALL
            .into_iter()
            .find(|easing| easing.name() == name)
            .ok_or_else(|| MotionError::unknown_easing(name))
    }

    /// Whether the curve leaves `[0, 1]` between the endpoints.
    #[must_use]
    pub const fn overshoots(self) -> bool {
        matches!(
            self,
            Self::EaseInElastic | Self::EaseOutElastic | Self::EaseInOutElastic
        )
    }

    /// Evaluate the curve at normalized progress `t`.
    ///
    /// `t` is expected in `[0, 1]`; the tween engine clamps before calling.
    #[must_use]
    pub fn evaluate(self, t: f64) -> f64 {
        match self {
            Self::Linear => t,
            Self::EaseInQuad => t * t,
            Self::EaseOutQuad => t * (2.0 - t),
            Self::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Self::EaseInCubic => t * t * t,
            Self::EaseOutCubic => {
                let t1 = t - 1.0;
                t1 * t1 * t1 + 1.0
            }
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    (t - 1.0) * (2.0 * t - 2.0) * (2.0 * t - 2.0) + 1.0
                }
            }
            Self::EaseInQuart => t * t * t * t,
            Self::EaseOutQuart => {
                let t1 = t - 1.0;
                1.0 - t1 * t1 * t1 * t1
            }
            Self::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    let t1 = t - 1.0;
                    1.0 - 8.0 * t1 * t1 * t1 * t1
                }
            }
            Self::EaseInElastic => elastic_in(t),
            Self::EaseOutElastic => elastic_out(t),
            Self::EaseInOutElastic => elastic_in_out(t),
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

fn elastic_in(t: f64) -> f64 {
    if t == 0.0 {
        0.0
    } else if t == 1.0 {
        1.0
    } else {
        -(2f64.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * C4).sin()
    }
}

fn elastic_out(t: f64) -> f64 {
    if t == 0.0 {
        0.0
    } else if t == 1.0 {
        1.0
    } else {
        2f64.powf(-10.0 * t) * ((t * 10.0 - 0.75) * C4).sin() + 1.0
    }
}

fn elastic_in_out(t: f64) -> f64 {
    if t == 0.0 {
        0.0
    } else if t == 1.0 {
        1.0
    } else if t < 0.5 {
        -(2f64.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * C5).sin()) / 2.0
    } else {
        (2f64.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * C5).sin()) / 2.0 + 1.0
    }
}

/// A sampled point of an eased animation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Normalized time (0.0-1.0)
    pub t: f64,
    /// Observed eased progress
    pub value: f64,
}

/// Result of checking keyframes against a curve.
#[derive(Clone, Debug, Serialize)]
pub struct EasingVerification {
    /// Expected easing curve
    pub expected: Easing,
    /// Maximum deviation from expected curve
    pub max_deviation: f64,
    /// Mean deviation
    pub mean_deviation: f64,
    /// Whether verification passed
    pub passed: bool,
    /// Per-keyframe deviations
    pub deviations: Vec<f64>,
}

/// Verify sampled keyframes against an expected easing curve.
#[must_use]
pub fn verify_easing(
    keyframes: &[Keyframe],
    expected: Easing,
    tolerance: f64,
) -> EasingVerification {
    let deviations: Vec<f64> = keyframes
        .iter()
        .map(|kf| (kf.value - expected.evaluate(kf.t.clamp(0.0, 1.0))).abs())
        .collect();

    let max_deviation = deviations.iter().copied().fold(0.0, f64::max);
    let mean_deviation = if deviations.is_empty() {
        0.0
    } else {
        deviations.iter().sum::<f64>() / deviations.len() as f64
    };

    EasingVerification {
        expected,
        max_deviation,
        mean_deviation,
        passed: max_deviation <= tolerance,
        deviations,
    }
}

/// Sample a curve at `num_samples` equally spaced points across `[0, 1]`.
#[must_use]
pub fn sample_easing(easing: Easing, num_samples: usize) -> Vec<Keyframe> {
    match num_samples {
        0 => Vec::new(),
        1 => vec![Keyframe {
            t: 0.0,
            value: easing.evaluate(0.0),
        }],
        n => (0..n)
            .map(|i| {
                let t = i as f64 / (n - 1) as f64;
                Keyframe {
                    t,
                    value: easing.evaluate(t),
                }
            })
            .collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_endpoints_for_every_curve() {
        for easing in Easing::ALL {
            assert!(easing.evaluate(0.0).abs() < EPS, "{easing} at 0");
            assert!((easing.evaluate(1.0) - 1.0).abs() < EPS, "{easing} at 1");
        }
    }

    #[test]
    fn test_quad_midpoints() {
        assert!((Easing::EaseInOutQuad.evaluate(0.5) - 0.5).abs() < EPS);
        assert!((Easing::EaseOutQuad.evaluate(0.5) - 0.75).abs() < EPS);
        assert!((Easing::EaseInQuad.evaluate(0.5) - 0.25).abs() < EPS);
    }

    #[test]
    fn test_cubic_and_quart_values() {
        assert!((Easing::EaseInCubic.evaluate(0.5) - 0.125).abs() < EPS);
        assert!((Easing::EaseOutCubic.evaluate(0.5) - 0.875).abs() < EPS);
        assert!((Easing::EaseInOutCubic.evaluate(0.5) - 0.5).abs() < EPS);
        assert!((Easing::EaseInQuart.evaluate(0.5) - 0.0625).abs() < EPS);
        assert!((Easing::EaseOutQuart.evaluate(0.5) - 0.9375).abs() < EPS);
        assert!((Easing::EaseInOutQuart.evaluate(0.5) - 0.5).abs() < EPS);
        assert!((Easing::EaseInOutQuart.evaluate(0.25) - 0.03125).abs() < EPS);
    }

    #[test]
    fn test_elastic_overshoots() {
        let peak = (1..100)
            .map(|i| Easing::EaseOutElastic.evaluate(f64::from(i) / 100.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.0);

        let trough = (1..100)
            .map(|i| Easing::EaseInElastic.evaluate(f64::from(i) / 100.0))
            .fold(f64::MAX, f64::min);
        assert!(trough < 0.0);
        assert!(Easing::EaseInOutElastic.overshoots());
        assert!(!Easing::EaseOutQuart.overshoots());
    }

    #[test]
    fn test_elastic_known_value() {
        // 2^-5 * sin(4.25 * 2pi/3) + 1
        let expected = 2f64.powf(-5.0) * (4.25 * C4).sin() + 1.0;
        assert!((Easing::EaseOutElastic.evaluate(0.5) - expected).abs() < EPS);
    }

    #[test]
    fn test_name_round_trip() {
        for easing in Easing::ALL {
            assert_eq!(Easing::from_name(easing.name()).unwrap(), easing);
            assert_eq!(easing.to_string().parse::<Easing>().unwrap(), easing);
        }
    }

    #[test]
    fn test_unknown_name_rejected() {
        let err = Easing::from_name("easeOutBounce").unwrap_err();
        assert!(matches!(err, MotionError::UnknownEasing { ref name } if name == "easeOutBounce"));
        assert!("EaseOutCubic".parse::<Easing>().is_err());
    }

    #[test]
    fn test_default_is_ease_out_cubic() {
        assert_eq!(Easing::default(), Easing::EaseOutCubic);
    }

    #[test]
    fn test_serde_uses_registry_names() {
        let json = serde_json::to_string(&Easing::EaseInOutElastic).unwrap();
        assert_eq!(json, "\"easeInOutElastic\"");
        let parsed: Easing = serde_json::from_str("\"easeInQuad\"").unwrap();
        assert_eq!(parsed, Easing::EaseInQuad);
    }

    #[test]
    fn test_sample_easing_linear() {
        let samples = sample_easing(Easing::Linear, 11);
        assert_eq!(samples.len(), 11);
        assert!((samples[5].t - 0.5).abs() < f64::EPSILON);
        assert!((samples[5].value - 0.5).abs() < f64::EPSILON);
        assert!((samples[10].value - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sample_easing_degenerate_counts() {
        assert!(sample_easing(Easing::Linear, 0).is_empty());
        assert_eq!(sample_easing(Easing::Linear, 1).len(), 1);
    }

    #[test]
    fn test_verify_easing_match_and_mismatch() {
        let samples = sample_easing(Easing::EaseInQuad, 21);
        assert!(verify_easing(&samples, Easing::EaseInQuad, 1e-12).passed);

        let linear = sample_easing(Easing::Linear, 21);
        let result = verify_easing(&linear, Easing::EaseInQuad, 0.01);
        assert!(!result.passed);
        assert!((result.max_deviation - 0.25).abs() < EPS);
        assert_eq!(result.deviations.len(), 21);
    }

    #[test]
    fn test_verify_easing_empty_passes() {
        let result = verify_easing(&[], Easing::Linear, 0.0);
        assert!(result.passed);
        assert!(result.mean_deviation.abs() < f64::EPSILON);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_linear_is_identity(t in 0.0f64..=1.0) {
                prop_assert!((Easing::Linear.evaluate(t) - t).abs() < EPS);
            }

            #[test]
            fn prop_polynomial_curves_stay_in_unit_range(
                idx in 0usize..10,
                t in 0.0f64..=1.0
            ) {
                let value = Easing::ALL[idx].evaluate(t);
                prop_assert!((-EPS..=1.0 + EPS).contains(&value));
            }

            #[test]
            fn prop_in_out_curves_are_symmetric(t in 0.0f64..=0.5) {
                let symmetric = [
                    Easing::EaseInOutQuad,
                    Easing::EaseInOutCubic,
                    Easing::EaseInOutQuart,
                ];
                for easing in symmetric {
                    let lhs = easing.evaluate(t);
                    let rhs = 1.0 - easing.evaluate(1.0 - t);
                    prop_assert!((lhs - rhs).abs() < 1e-9);
                }
            }
        }
    }
}

//! Easing curve listing and sampling.

use crate::commands::{CurvesArgs, OutputFormat, SampleArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use folio_motion::{sample_easing, Easing, Keyframe};
use serde::Serialize;
use std::fmt::Write as _;

/// One registry entry as listed by `folio curves`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveInfo {
    /// Registered name
    pub name: &'static str,
    /// Whether the curve leaves `[0, 1]`
    pub overshoots: bool,
    /// Marked as the engine default
    pub default: bool,
}

/// Every registered curve, in registry order
#[must_use]
pub fn list_curves(default: Easing) -> Vec<CurveInfo> {
    Easing::ALL
        .iter()
        .map(|&easing| CurveInfo {
            name: easing.name(),
            overshoots: easing.overshoots(),
            default: easing == default,
        })
        .collect()
}

/// Execute the curves command.
pub fn execute_curves(config: &CliConfig, args: &CurvesArgs) -> CliResult<()> {
    let curves = list_curves(config.engine.default_easing);
    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&curves)?),
        OutputFormat::Text => print!("{}", render_curves(&curves)),
    }
    Ok(())
}

/// Text listing, one curve per line
#[must_use]
pub fn render_curves(curves: &[CurveInfo]) -> String {
    let mut out = String::new();
    for curve in curves {
        let mut notes = Vec::new();
        if curve.default {
            notes.push("default");
        }
        if curve.overshoots {
            notes.push("overshoots");
        }
        if notes.is_empty() {
            let _ = writeln!(out, "{}", curve.name);
        } else {
            let _ = writeln!(out, "{:<18} ({})", curve.name, notes.join(", "));
        }
    }
    out
}

/// Execute the sample command.
pub fn execute_sample(config: &CliConfig, args: &SampleArgs) -> CliResult<()> {
    if args.samples < 2 {
        return Err(CliError::invalid_argument(
            "--samples must be at least 2 to cover both ends",
        ));
    }
    let easing = Easing::from_name(&args.easing)?;
    if config.verbosity.is_verbose() {
        eprintln!("Sampling {easing} at {} points", args.samples);
    }
    let keyframes = sample_easing(easing, args.samples);
    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&keyframes)?),
        OutputFormat::Text => print!("{}", render_samples(&keyframes)),
    }
    Ok(())
}

/// Two-column `t value` table
#[must_use]
pub fn render_samples(keyframes: &[Keyframe]) -> String {
    let mut out = String::from("t       value\n");
    for kf in keyframes {
        let _ = writeln!(out, "{:.3}   {:.6}", kf.t, kf.value);
    }
    out
}

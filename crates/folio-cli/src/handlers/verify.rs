//! Easing verification command handler.
//!
//! Orchestrates: read keyframes -> resolve curve -> verify -> render report.

use crate::commands::{OutputFormat, VerifyArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::Reporter;
use folio_motion::{verify_easing, Easing, EasingVerification, Keyframe};
use std::fmt::Write as _;

/// Execute the verify command.
pub fn execute_verify(config: &CliConfig, args: &VerifyArgs) -> CliResult<()> {
    if !args.tolerance.is_finite() || args.tolerance < 0.0 {
        return Err(CliError::invalid_argument(format!(
            "--tolerance must be a non-negative number, got {}",
            args.tolerance
        )));
    }
    if !args.keyframes.exists() {
        return Err(CliError::invalid_argument(format!(
            "Keyframes file not found: {}",
            args.keyframes.display()
        )));
    }

    let expected = Easing::from_name(&args.easing)?;
    let keyframes: Vec<Keyframe> =
        serde_json::from_str(&std::fs::read_to_string(&args.keyframes)?)?;
    tracing::debug!(
        path = %args.keyframes.display(),
        count = keyframes.len(),
        easing = %expected,
        "verifying keyframes"
    );

    let verification = verify_easing(&keyframes, expected, args.tolerance);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&verification)?),
        OutputFormat::Text => {
            print!("{}", render_verification(&keyframes, &verification));
            let reporter = Reporter::new(config.color.should_color(), config.verbosity.is_quiet());
            if verification.passed {
                reporter.success(&format!("Keyframes follow {expected}"));
            } else {
                reporter.failure(&format!(
                    "Keyframes stray from {expected} beyond {}",
                    args.tolerance
                ));
            }
        }
    }

    if verification.passed {
        Ok(())
    } else {
        Err(CliError::verification(expected.name(), verification.max_deviation))
    }
}

/// Deviation table plus summary lines
#[must_use]
pub fn render_verification(keyframes: &[Keyframe], verification: &EasingVerification) -> String {
    let mut out = String::from("t       observed   deviation\n");
    for (kf, deviation) in keyframes.iter().zip(&verification.deviations) {
        let _ = writeln!(out, "{:.3}   {:.6}   {:.6}", kf.t, kf.value, deviation);
    }
    let _ = writeln!(out, "max deviation:  {:.6}", verification.max_deviation);
    let _ = writeln!(out, "mean deviation: {:.6}", verification.mean_deviation);
    out
}

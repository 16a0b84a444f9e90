//! Tween simulation command handler.
//!
//! Orchestrates: resolve options -> seed recording surfaces -> stagger the
//! tween -> run frames until idle -> render every write.

use crate::commands::{OutputFormat, SimulateArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::Reporter;
use folio_motion::style::format_value;
use folio_motion::{
    Easing, EngineConfig, MemoryDocument, Properties, SimulatedHost, StyleWrite, Surface,
    SurfaceRef, TweenEngine, TweenOutcome,
};
use futures::FutureExt;
use serde::Serialize;
use std::fmt::Write as _;
use std::rc::Rc;

/// Writes received by one simulated target.
#[derive(Debug, Clone, Serialize)]
pub struct TargetTrace {
    /// Target label
    pub surface: String,
    /// How the target's tween ended
    pub outcome: TweenOutcome,
    /// Style writes, oldest first
    pub writes: Vec<StyleWrite>,
}

/// Result of a simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    /// Animated property
    pub property: String,
    /// Curve used
    pub easing: Easing,
    /// Tween duration
    pub duration_ms: f64,
    /// Delay between target starts
    pub stagger_ms: f64,
    /// Frames the host rendered
    pub frames: usize,
    /// One trace per target, in start order
    pub targets: Vec<TargetTrace>,
}

/// Run the requested tweens on recording surfaces under a simulated host.
pub fn simulate(
    engine_config: &EngineConfig,
    args: &SimulateArgs,
) -> CliResult<SimulationReport> {
    if args.targets == 0 {
        return Err(CliError::invalid_argument("--targets must be at least 1"));
    }
    if args.max_frames == 0 {
        return Err(CliError::invalid_argument("--max-frames must be at least 1"));
    }
    if !(args.frame_ms.is_finite() && args.frame_ms > 0.0) {
        return Err(CliError::invalid_argument(format!(
            "--frame-ms must be positive, got {}",
            args.frame_ms
        )));
    }

    let mut options = engine_config.tween_options();
    if let Some(duration) = args.duration {
        options = options.with_duration(duration);
    }
    if let Some(name) = &args.easing {
        options = options.with_easing_name(name)?;
    }
    let stagger_ms = args.stagger_ms.unwrap_or(engine_config.stagger_delay_ms);

    let host = SimulatedHost::shared();
    let document = MemoryDocument::with_clock(host.clock());
    let engine = TweenEngine::with_config(host.clone(), engine_config.clone());

    let start = format_value(&args.property, args.from);
    let recordings: Vec<_> = (0..args.targets)
        .map(|_| {
            let surface = document.create_recording();
            surface.set_style(&args.property, &start);
            surface.clear_writes();
            surface
        })
        .collect();
    let targets: Vec<SurfaceRef> = recordings
        .iter()
        .map(|s| Rc::clone(s) as SurfaceRef)
        .collect();

    let props = Properties::new().with(args.property.as_str(), args.to);
    let handle = engine.stagger(&targets, props, &options, stagger_ms)?;
    tracing::info!(
        targets = targets.len(),
        duration_ms = options.duration_ms,
        easing = %options.easing,
        "simulation started"
    );

    let frames = host.run_until_idle(args.frame_ms, args.max_frames);
    let outcomes = handle
        .now_or_never()
        .ok_or(CliError::simulation(frames))?;

    let targets = recordings
        .iter()
        .zip(outcomes)
        .map(|(surface, outcome)| TargetTrace {
            surface: surface.id().to_string(),
            outcome,
            writes: surface.writes(),
        })
        .collect();

    Ok(SimulationReport {
        property: args.property.clone(),
        easing: options.easing,
        duration_ms: options.duration_ms,
        stagger_ms,
        frames,
        targets,
    })
}

/// Execute the simulate command.
pub fn execute_simulate(config: &CliConfig, args: &SimulateArgs) -> CliResult<()> {
    let reporter = Reporter::new(config.color.should_color(), config.verbosity.is_quiet());
    let report = match simulate(&config.engine, args) {
        Ok(report) => report,
        Err(err @ CliError::Simulation { .. }) => {
            reporter.warning("raise --max-frames or --frame-ms, or shorten --duration");
            return Err(err);
        }
        Err(err) => return Err(err),
    };
    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            print!("{}", render_report(&report));
            reporter.info(&summary(&report));
        }
    }
    Ok(())
}

/// One-line outcome count, e.g. `3 target(s) in 20 frames: 3 completed`
#[must_use]
pub fn summary(report: &SimulationReport) -> String {
    let completed = report
        .targets
        .iter()
        .filter(|t| t.outcome == TweenOutcome::Completed)
        .count();
    let mut line = format!(
        "{} target(s) in {} frames: {completed} completed",
        report.targets.len(),
        report.frames
    );
    let other = report.targets.len() - completed;
    if other > 0 {
        let _ = write!(line, ", {other} interrupted");
    }
    line
}

/// Text rendering: a header, then one line per write
#[must_use]
pub fn render_report(report: &SimulationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} over {}ms with {} ({} frames)",
        report.property, report.duration_ms, report.easing, report.frames
    );
    for target in &report.targets {
        let _ = writeln!(out, "{} [{}]", target.surface, target.outcome);
        for write in &target.writes {
            let at = write
                .at_ms
                .map_or_else(|| "-".to_string(), |ms| format!("{ms:.0}ms"));
            let _ = writeln!(out, "  {at:>8}  {}={}", write.property, write.value);
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn args() -> SimulateArgs {
        SimulateArgs {
            property: "width".to_string(),
            from: 0.0,
            to: 100.0,
            duration: Some(64.0),
            easing: Some("linear".to_string()),
            frame_ms: 16.0,
            targets: 1,
            stagger_ms: None,
            max_frames: 100_000,
            format: OutputFormat::Text,
        }
    }

    #[test]
    fn test_linear_simulation_writes() {
        let report = simulate(&EngineConfig::default(), &args()).unwrap();
        let target = &report.targets[0];
        let values: Vec<&str> = target.writes.iter().map(|w| w.value.as_str()).collect();
        assert_eq!(values, vec!["25px", "50px", "75px", "100px"]);
        assert_eq!(target.outcome, TweenOutcome::Completed);
        assert_eq!(target.writes[0].at_ms, Some(16.0));
        assert_eq!(report.frames, 4);
    }

    #[test]
    fn test_starts_from_seeded_value() {
        let mut a = args();
        a.property = "opacity".to_string();
        a.from = 1.0;
        a.to = 0.0;
        a.duration = Some(32.0);
        let report = simulate(&EngineConfig::default(), &a).unwrap();
        let values: Vec<&str> = report.targets[0]
            .writes
            .iter()
            .map(|w| w.value.as_str())
            .collect();
        assert_eq!(values, vec!["0.5", "0"]);
    }

    #[test]
    fn test_engine_defaults_apply() {
        let mut a = args();
        a.duration = None;
        a.easing = None;
        let config = EngineConfig::default().with_duration(32.0);
        let report = simulate(&config, &a).unwrap();
        assert_eq!(report.duration_ms, 32.0);
        assert_eq!(report.easing, Easing::EaseOutCubic);
    }

    #[test]
    fn test_staggered_targets() {
        let mut a = args();
        a.targets = 3;
        a.stagger_ms = Some(100.0);
        let report = simulate(&EngineConfig::default(), &a).unwrap();
        assert_eq!(report.targets.len(), 3);
        assert!(report
            .targets
            .iter()
            .all(|t| t.outcome == TweenOutcome::Completed));
        let first_write = |i: usize| report.targets[i].writes[0].at_ms.unwrap();
        assert!(first_write(1) >= 100.0);
        assert!(first_write(2) >= 200.0);
    }

    #[test]
    fn test_rejects_bad_arguments() {
        let mut a = args();
        a.targets = 0;
        assert!(simulate(&EngineConfig::default(), &a).is_err());

        let mut a = args();
        a.easing = Some("wobble".to_string());
        assert!(matches!(
            simulate(&EngineConfig::default(), &a),
            Err(CliError::Motion(_))
        ));

        let mut a = args();
        a.duration = Some(0.0);
        assert!(matches!(
            simulate(&EngineConfig::default(), &a),
            Err(CliError::Motion(_))
        ));
    }

    #[test]
    fn test_frame_budget_overrun() {
        let mut a = args();
        a.duration = Some(1000.0);
        a.max_frames = 10;
        let err = simulate(&EngineConfig::default(), &a).unwrap_err();
        assert!(matches!(err, CliError::Simulation { frames: 10 }));

        let err = execute_simulate(&CliConfig::default(), &a).unwrap_err();
        assert!(matches!(err, CliError::Simulation { .. }));
    }

    #[test]
    fn test_zero_frame_budget_rejected() {
        let mut a = args();
        a.max_frames = 0;
        assert!(matches!(
            simulate(&EngineConfig::default(), &a),
            Err(CliError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_summary() {
        let mut a = args();
        a.targets = 2;
        let report = simulate(&EngineConfig::default(), &a).unwrap();
        assert_eq!(
            summary(&report),
            format!("2 target(s) in {} frames: 2 completed", report.frames)
        );
    }

    #[test]
    fn test_render_report() {
        let report = simulate(&EngineConfig::default(), &args()).unwrap();
        let text = render_report(&report);
        assert!(text.starts_with("width over 64ms with linear (4 frames)"));
        assert!(text.contains("[completed]"));
        assert!(text.contains("64ms  width=100px"));
    }
}

//! Folio CLI: easing curves, tween simulation and form checks
//!
//! ## Usage
//!
//! ```bash
//! folio curves                            # List easing curves
//! folio sample easeOutElastic -n 20       # Sample a curve
//! folio verify frames.json -e easeOutQuad  # Check recorded keyframes
//! folio simulate --to 300 --targets 3     # Staggered tween, every write
//! folio validate --name Ada --email a@b.co --subject Hi --message Hello
//! folio theme toggle                      # Flip the stored theme
//! ```

use clap::Parser;
use folio_cli::{
    handlers::{
        execute_curves, execute_sample, execute_simulate, execute_theme, execute_validate,
        execute_verify,
    },
    Cli, CliConfig, CliResult, ColorChoice, Commands, Verbosity,
};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let config = build_config(&cli)?;
    init_logging(&config);

    match &cli.command {
        Commands::Curves(args) => execute_curves(&config, args),
        Commands::Sample(args) => execute_sample(&config, args),
        Commands::Verify(args) => execute_verify(&config, args),
        Commands::Simulate(args) => execute_simulate(&config, args),
        Commands::Validate(args) => execute_validate(&config, args),
        Commands::Theme(args) => execute_theme(&config, args),
    }
}

fn build_config(cli: &Cli) -> CliResult<CliConfig> {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let color: ColorChoice = cli.color.clone().into();
    let config = CliConfig::new().with_verbosity(verbosity).with_color(color);

    match &cli.config {
        Some(path) => config.with_engine_file(path),
        None => Ok(config),
    }
}

// RUST_LOG overrides the level picked from -v/-q.
fn init_logging(config: &CliConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.log_filter()));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(config.color.should_color())
                .with_target(false),
        )
        .with(filter)
        .init();
}

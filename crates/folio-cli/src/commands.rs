//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Folio: easing curves, tween simulation and contact form checks
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Engine configuration file (YAML, or JSON by extension)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered easing curves
    Curves(CurvesArgs),

    /// Sample an easing curve
    Sample(SampleArgs),

    /// Check observed keyframes against an easing curve
    Verify(VerifyArgs),

    /// Run tweens under a simulated frame clock and print every write
    Simulate(SimulateArgs),

    /// Validate contact form input
    Validate(ValidateArgs),

    /// Show or toggle the stored theme
    Theme(ThemeArgs),
}

/// Arguments for the curves command
#[derive(Parser, Debug)]
pub struct CurvesArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the sample command
#[derive(Parser, Debug)]
pub struct SampleArgs {
    /// Easing name, e.g. easeOutCubic
    pub easing: String,

    /// Number of samples over 0..=1
    #[arg(short = 'n', long, default_value = "10")]
    pub samples: usize,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the verify command
#[derive(Parser, Debug)]
pub struct VerifyArgs {
    /// JSON file holding an array of `{"t": .., "value": ..}` keyframes
    pub keyframes: PathBuf,

    /// Expected easing name
    #[arg(short, long)]
    pub easing: String,

    /// Largest accepted deviation
    #[arg(long, default_value = "0.001")]
    pub tolerance: f64,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the simulate command
#[derive(Parser, Debug)]
pub struct SimulateArgs {
    /// Style property to animate
    #[arg(short, long, default_value = "width")]
    pub property: String,

    /// Starting computed value
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub from: f64,

    /// Target value
    #[arg(long, default_value = "100", allow_negative_numbers = true)]
    pub to: f64,

    /// Duration in milliseconds (engine default when unset)
    #[arg(short, long)]
    pub duration: Option<f64>,

    /// Easing name (engine default when unset)
    #[arg(short, long)]
    pub easing: Option<String>,

    /// Frame interval in milliseconds
    #[arg(long, default_value = "16")]
    pub frame_ms: f64,

    /// Frames rendered before the simulation is given up
    #[arg(long, default_value = "100000")]
    pub max_frames: usize,

    /// Number of targets animated as a staggered group
    #[arg(short, long, default_value = "1")]
    pub targets: usize,

    /// Delay between target starts (engine default when unset)
    #[arg(long)]
    pub stagger_ms: Option<f64>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Sender name
    #[arg(long, default_value = "")]
    pub name: String,

    /// Sender email
    #[arg(long, default_value = "")]
    pub email: String,

    /// Message subject
    #[arg(long, default_value = "")]
    pub subject: String,

    /// Message body
    #[arg(long, default_value = "")]
    pub message: String,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the theme command
#[derive(Parser, Debug)]
pub struct ThemeArgs {
    /// What to do with the stored theme
    #[arg(value_enum, default_value = "show")]
    pub action: ThemeAction,

    /// Preference file
    #[arg(long, default_value = ".folio/preferences.json")]
    pub store: PathBuf,
}

/// Theme command action
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeAction {
    /// Print the stored theme
    #[default]
    Show,
    /// Switch between light and dark
    Toggle,
}

/// Output format for command results
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Color argument
#[derive(ValueEnum, Debug, Clone, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

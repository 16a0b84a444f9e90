//! Folio CLI Library
//!
//! Command-line front end for folio-motion: list, sample and verify easing curves,
//! simulate tweens under a fake frame clock, check contact form input and
//! manage the stored theme.

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
pub mod handlers;
mod output;

pub use commands::{
    Cli, ColorArg, Commands, CurvesArgs, OutputFormat, SampleArgs, SimulateArgs, ThemeAction,
    ThemeArgs, ValidateArgs, VerifyArgs,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::Reporter;

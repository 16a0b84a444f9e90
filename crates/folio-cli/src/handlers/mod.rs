//! Command handlers - one module per subcommand
//!
//! Each handler module contains:
//! - The execution logic for a CLI command
//! - Pure helper functions the tests drive directly

pub mod curves;
pub mod simulate;
pub mod theme;
pub mod validate;
pub mod verify;

pub use curves::{execute_curves, execute_sample, list_curves, render_curves, render_samples};
pub use simulate::{
    execute_simulate, render_report, simulate, summary, SimulationReport, TargetTrace,
};
pub use theme::{execute_theme, run_theme};
pub use validate::{execute_validate, validate_form, ValidationReport};
pub use verify::{execute_verify, render_verification};

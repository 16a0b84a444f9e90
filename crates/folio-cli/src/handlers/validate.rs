//! Contact form validation command handler.

use crate::commands::{OutputFormat, ValidateArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::Reporter;
use folio_motion::{ContactForm, FieldError};
use serde::Serialize;

/// Validation outcome as printed by `--format json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    /// Whether every field passed
    pub valid: bool,
    /// Failing fields in form order
    pub errors: Vec<FieldError>,
}

/// Validate the form built from `args`
#[must_use]
pub fn validate_form(args: &ValidateArgs) -> ValidationReport {
    let form = ContactForm::new(
        args.name.as_str(),
        args.email.as_str(),
        args.subject.as_str(),
        args.message.as_str(),
    );
    let errors = form.validate();
    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

/// Execute the validate command.
///
/// Invalid input is reported and turned into a failing exit status.
pub fn execute_validate(config: &CliConfig, args: &ValidateArgs) -> CliResult<()> {
    let report = validate_form(args);
    tracing::debug!(valid = report.valid, errors = report.errors.len(), "form validated");

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            let reporter = Reporter::new(config.color.should_color(), config.verbosity.is_quiet());
            if report.valid {
                reporter.success("Message accepted");
            }
            for error in &report.errors {
                reporter.failure(&error.to_string());
            }
        }
    }

    if report.valid {
        Ok(())
    } else {
        Err(CliError::validation(report.errors.len()))
    }
}

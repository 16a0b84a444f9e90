//! Theme preference command handler.

use crate::commands::{ThemeAction, ThemeArgs};
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::Reporter;
use folio_motion::{JsonFileStore, Theme, ThemeController};

/// Apply `action` to the theme stored at `args.store`
pub fn run_theme(args: &ThemeArgs) -> CliResult<Theme> {
    let mut controller = ThemeController::load(JsonFileStore::new(&args.store))?;
    match args.action {
        ThemeAction::Show => Ok(controller.theme()),
        ThemeAction::Toggle => Ok(controller.toggle()?),
    }
}

/// Execute the theme command.
pub fn execute_theme(config: &CliConfig, args: &ThemeArgs) -> CliResult<()> {
    let theme = run_theme(args)?;
    if args.action == ThemeAction::Toggle {
        let reporter = Reporter::new(config.color.should_color(), config.verbosity.is_quiet());
        reporter.success(&format!(
            "Theme set to {theme} in {}",
            args.store.display()
        ));
    }
    println!("{theme}");
    Ok(())
}

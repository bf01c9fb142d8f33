use std::process::ExitCode;

use clap::Parser;
use log::debug;
use promptkit_cli::cli_args::Args;
use promptkit_cli::colors::validate_theme;
use promptkit_cli::commands::{self, Outcome};
use promptkit_core::error::Result;
use promptkit_core::theme::Theme;
use promptkit_core::{config, file_handling};

/// Exit status of a cancelled prompt, as after `Ctrl+C` in a shell.
const CANCELLED_EXIT_CODE: u8 = 130;

/// Loads the theme, falling back to the default when no file exists.
fn load_theme(args: &Args) -> Result<Theme> {
    let theme_path = config::get_theme_path(&args.theme);
    debug!("Theme path: `{theme_path}`");

    let theme = match file_handling::load_theme_override(&theme_path, args.theme.is_some())? {
        Some(overrides) => Theme::default().merged(&overrides),
        None => Theme::default(),
    };
    validate_theme(&theme)?;
    Ok(theme)
}

fn execute() -> Result<Outcome> {
    let args = Args::parse();
    let theme = load_theme(&args)?;
    commands::execute(args.command, &theme)
}

fn main() -> ExitCode {
    env_logger::init();

    match execute() {
        Ok(Outcome::Completed) => ExitCode::SUCCESS,
        Ok(Outcome::Cancelled) => ExitCode::from(CANCELLED_EXIT_CODE),
        Ok(Outcome::Failed) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

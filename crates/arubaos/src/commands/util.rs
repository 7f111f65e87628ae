//! Shared helpers for command handlers.

use owo_colors::OwoColorize;

use arubaos_api::{MacAddress, Outcome};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Report a change request's outcome on stderr. A change the switch did
/// not apply becomes an error so the exit code reflects it.
pub fn report(
    outcome: Outcome,
    applied: &str,
    unchanged: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let line = match outcome {
        Outcome::Applied if color => format!("{} {applied}", "✓".green()),
        Outcome::Applied => applied.to_owned(),
        Outcome::AlreadySatisfied if color => format!("{} {unchanged}", "=".dimmed()),
        Outcome::AlreadySatisfied => unchanged.to_owned(),
        Outcome::NotApplied { reason } => return Err(CliError::NotApplied { reason }),
    };
    if !global.quiet {
        eprintln!("{line}");
    }
    Ok(())
}

/// Parse a MAC address given on the command line.
pub fn parse_mac(raw: &str) -> Result<MacAddress, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: "mac".into(),
        reason: format!("'{raw}' is not a MAC address"),
    })
}

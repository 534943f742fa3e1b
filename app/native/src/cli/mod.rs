//! CLI module for Spaces.
//!
//! Inspects and validates the configuration file offline. Workspace commands
//! themselves are driven through [`crate::modules::workspaces::StateActorHandle`].

mod commands;
mod output;

use clap::Parser;
pub use commands::Cli;

use crate::error::SpacesError;

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), SpacesError> {
    let cli = Cli::parse();
    cli.execute()
}

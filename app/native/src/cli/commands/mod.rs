//! CLI command definitions using Clap.
//!
//! - `config_cmd` - Configuration file management commands
//! - `workspaces` - Workspace listing from the configuration file

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::error::SpacesError;
use crate::{config, schema};

pub mod config_cmd;
pub mod workspaces;

pub use config_cmd::ConfigCommands;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Expands `~` in a user-supplied path.
pub fn expand_path(path: &str) -> PathBuf { PathBuf::from(shellexpand::tilde(path).as_ref()) }

/// Spaces CLI - virtual workspaces for macOS.
#[derive(Parser, Debug)]
#[command(name = "spaces")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Configuration file management commands.
    ///
    /// Initialize, inspect, and validate the configuration file.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// List the workspaces of a profile.
    Workspaces {
        /// Profile to list instead of the active one.
        #[arg(long, short)]
        profile: Option<String>,

        /// Output the profile as JSON.
        #[arg(long, short)]
        json: bool,
    },

    /// Output Spaces configuration JSON Schema.
    ///
    /// Outputs a JSON Schema to stdout that describes the structure of the
    /// configuration file. Can be redirected to a file for use with editors
    /// that support JSON Schema validation.
    Schema,

    /// Generate shell completions.
    ///
    /// Usage:
    ///   eval "$(spaces completions --shell zsh)"
    ///   spaces completions --shell fish > ~/.config/fish/completions/spaces.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Returns the custom config path if specified via --config flag.
    #[must_use]
    pub fn config_path(&self) -> Option<PathBuf> { self.config.as_deref().map(expand_path) }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<(), SpacesError> {
        if let Some(path) = self.config_path() {
            if !path.exists() {
                return Err(SpacesError::ConfigError(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            config::set_custom_config_path(path);
        }

        match &self.command {
            Commands::Config(cmd) => config_cmd::execute(cmd),
            Commands::Workspaces { profile, json } => workspaces::execute(profile.as_deref(), *json),
            Commands::Schema => {
                println!("{}", schema::print_schema());
                Ok(())
            }
            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, "spaces", &mut io::stdout());
    }
}

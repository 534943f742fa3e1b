//! Config CLI commands.
//!
//! Commands for managing the Spaces configuration file.

use std::path::PathBuf;

use clap::Subcommand;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::expand_path;
use crate::cli::output::{on_off, print_json};
use crate::config::template::{create_config_file, generate_config_template};
use crate::config::{Settings, config_paths, custom_config_path, load_config};
use crate::error::SpacesError;

/// Config management commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum ConfigCommands {
    /// Initialize a new configuration file with all options documented.
    ///
    /// Creates a new configuration file at the default location with a
    /// single empty profile and every setting commented out.
    #[command(
        name = "init",
        after_long_help = r#"Examples:
  spaces config init              # Create config at default location
  spaces config init --force      # Overwrite existing config
  spaces config init --path ~/my-config.jsonc  # Create at custom path
  spaces config init --stdout     # Print template to stdout"#
    )]
    Init {
        /// Overwrite existing configuration file if it exists.
        #[arg(long, short)]
        force: bool,

        /// Custom path for the configuration file.
        /// If not specified, uses ~/.config/spaces/config.jsonc
        #[arg(long, short, value_name = "PATH")]
        path: Option<String>,

        /// Print the configuration template to stdout instead of writing to a file.
        #[arg(long)]
        stdout: bool,
    },

    /// Show the path to the configuration file.
    ///
    /// Displays the paths where Spaces looks for configuration files,
    /// and indicates which one is currently in use (if any).
    Path,

    /// Show the effective settings of the loaded configuration.
    Show {
        /// Output the whole configuration as JSON.
        #[arg(long, short)]
        json: bool,
    },

    /// Load and validate the configuration file.
    ///
    /// Reports duplicate workspace names or ids, apps listed twice in one
    /// workspace, and invalid PiP title patterns.
    Validate,
}

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cmd: &ConfigCommands) -> Result<(), SpacesError> {
    match cmd {
        ConfigCommands::Init { force, path, stdout } => {
            if *stdout {
                println!("{}", generate_config_template());
                Ok(())
            } else {
                init_config(*force, path.as_deref().map(expand_path))
            }
        }
        ConfigCommands::Path => {
            show_config_path();
            Ok(())
        }
        ConfigCommands::Show { json } => show_config(*json),
        ConfigCommands::Validate => validate_config(),
    }
}

/// Initialize a new configuration file.
fn init_config(force: bool, custom_path: Option<PathBuf>) -> Result<(), SpacesError> {
    let config_path = custom_path
        .or_else(|| config_paths().into_iter().next())
        .unwrap_or_else(|| PathBuf::from("config.jsonc"));

    if config_path.exists() && !force {
        return Err(SpacesError::ConfigError(format!(
            "Configuration file already exists at: {}\nUse --force to overwrite.",
            config_path.display()
        )));
    }

    create_config_file(&config_path).map_err(|e| {
        SpacesError::ConfigError(format!(
            "Failed to create config file {}: {e}",
            config_path.display()
        ))
    })?;

    println!("Configuration file created at: {}", config_path.display());
    println!("\nAdd workspaces to the \"Default\" profile to get started.");

    Ok(())
}

/// Show the configuration file path.
fn show_config_path() {
    if let Some(path) = custom_config_path() {
        let marker = if path.exists() { " (active)" } else { " (missing)" };
        println!("Custom configuration file:\n\n  {}{marker}", path.display());
        return;
    }

    println!("Configuration file search paths (in priority order):\n");

    let mut found_config = false;
    for (i, path) in config_paths().iter().enumerate() {
        let exists = path.exists();
        let marker = if exists && !found_config {
            found_config = true;
            " (active)"
        } else if exists {
            " (exists)"
        } else {
            ""
        };

        println!("  {}. {}{}", i + 1, path.display(), marker);
    }

    if !found_config {
        println!("\nNo configuration file found.");
        println!("Run 'spaces config init' to create one.");
    }
}

#[derive(Tabled)]
struct SettingRow {
    #[tabled(rename = "Setting")]
    name: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn setting(name: &'static str, value: impl Into<String>) -> SettingRow {
    SettingRow { name, value: value.into() }
}

fn settings_rows(settings: &Settings) -> Vec<SettingRow> {
    let display_mode = if settings.is_dynamic() { "dynamic" } else { "static" };
    let floating = settings
        .floating_apps
        .iter()
        .map(|app| app.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let pip = &settings.picture_in_picture;

    vec![
        setting("displayMode", display_mode),
        setting("alternativeDisplays", settings.alternative_displays.clone()),
        setting("changeWorkspaceOnAppAssign", on_off(settings.change_workspace_on_app_assign)),
        setting("keepUnassignedAppsOnSwitch", on_off(settings.keep_unassigned_apps_on_switch)),
        setting(
            "activateWorkspaceOnFocusChange",
            on_off(settings.activate_workspace_on_focus_change),
        ),
        setting("loopWorkspaces", on_off(settings.loop_workspaces)),
        setting(
            "skipEmptyWorkspacesOnSwitch",
            on_off(settings.skip_empty_workspaces_on_switch),
        ),
        setting(
            "centerCursorOnWorkspaceChange",
            on_off(settings.center_cursor_on_workspace_change),
        ),
        setting("centerCursorOnFocusChange", on_off(settings.center_cursor_on_focus_change)),
        setting("focusFrontmostWindow", on_off(settings.focus_frontmost_window)),
        setting("floatingApps", floating),
        setting("pictureInPicture.enabled", on_off(pip.enabled)),
        setting("pictureInPicture.screenCornerOffset", pip.screen_corner_offset.to_string()),
        setting("pictureInPicture.apps", pip.apps.len().to_string()),
        setting("fileManagerBundleId", settings.file_manager_bundle_id.clone()),
    ]
}

fn show_config(json: bool) -> Result<(), SpacesError> {
    let (config, path) = load_config()?;

    if json {
        return print_json(&config);
    }

    let active = config.active_profile().map_or("-", |profile| profile.name.as_str());
    println!("File:     {}", path.display());
    println!("Profile:  {active} ({} total)\n", config.profiles.len());

    let table = Table::new(settings_rows(&config.settings))
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..2)).with(Alignment::left()))
        .to_string();
    println!("{table}");

    Ok(())
}

fn validate_config() -> Result<(), SpacesError> {
    let (config, path) = load_config()?;
    let workspaces: usize = config.profiles.iter().map(|p| p.workspaces.len()).sum();

    println!("Configuration is valid: {}", path.display());
    println!("  {} profile(s), {workspaces} workspace(s)", config.profiles.len());

    Ok(())
}

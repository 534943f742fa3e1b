//! Workspace listing command.
//!
//! Prints the workspaces of a profile as read from the configuration file.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::cli::output::{print_json, summarize_apps};
use crate::config::{ProfileConfig, SpacesConfig, load_config};
use crate::error::SpacesError;

const MAX_APPS_WIDTH: usize = 48;

#[derive(Tabled)]
struct WorkspaceRow {
    #[tabled(rename = "#")]
    number: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Display")]
    display: String,
    #[tabled(rename = "Apps")]
    apps: String,
    #[tabled(rename = "Focus")]
    focus: String,
    #[tabled(rename = "Shortcut")]
    shortcut: String,
}

fn workspace_rows(profile: &ProfileConfig, dynamic: bool) -> Vec<WorkspaceRow> {
    profile
        .workspaces
        .iter()
        .enumerate()
        .map(|(index, workspace)| {
            let apps: Vec<&str> = workspace.apps.iter().map(|app| app.name.as_str()).collect();

            let focus = workspace.app_to_focus.as_ref().map_or("-", |app| app.name.as_str());

            WorkspaceRow {
                number: index + 1,
                name: workspace.name.clone(),
                display: if dynamic { "(dynamic)".to_string() } else { workspace.display.clone() },
                apps: summarize_apps(&apps, MAX_APPS_WIDTH),
                focus: focus.to_string(),
                shortcut: workspace.activate_shortcut.clone().unwrap_or_else(|| "-".to_string()),
            }
        })
        .collect()
}

fn select_profile<'a>(
    config: &'a SpacesConfig,
    name: Option<&str>,
) -> Result<&'a ProfileConfig, SpacesError> {
    match name {
        Some(name) => config
            .profile(name)
            .ok_or_else(|| SpacesError::InvalidArguments(format!("unknown profile '{name}'"))),
        None => config
            .active_profile()
            .ok_or_else(|| SpacesError::ConfigError("no profiles configured".to_string())),
    }
}

/// Lists the workspaces of the active profile, or of `profile` when given.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the profile
/// does not exist.
pub fn execute(profile: Option<&str>, json: bool) -> Result<(), SpacesError> {
    let (config, _) = load_config()?;
    let selected = select_profile(&config, profile)?;

    if json {
        return print_json(selected);
    }

    if selected.workspaces.is_empty() {
        println!("Profile '{}' has no workspaces.", selected.name);
        return Ok(());
    }

    let rows = workspace_rows(selected, config.settings.is_dynamic());
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::right()))
        .to_string();

    println!("Profile: {}\n", selected.name);
    println!("{table}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppRef, WorkspaceConfig};

    fn profile() -> ProfileConfig {
        let mut dev = WorkspaceConfig::new("Dev", "main");
        dev.apps = vec![
            AppRef::new("Xcode", "com.apple.dt.Xcode"),
            AppRef::new("Terminal", "com.apple.Terminal"),
        ];
        dev.app_to_focus = Some(AppRef::new("Xcode", "com.apple.dt.Xcode"));
        dev.activate_shortcut = Some("cmd+opt+1".to_string());

        ProfileConfig {
            name: "Work".to_string(),
            workspaces: vec![dev, WorkspaceConfig::new("Chat", "Side")],
        }
    }

    #[test]
    fn test_rows_are_numbered_from_one() {
        let rows = workspace_rows(&profile(), false);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].number, 1);
        assert_eq!(rows[1].number, 2);
        assert_eq!(rows[1].display, "Side");
    }

    #[test]
    fn test_rows_describe_apps_and_focus() {
        let rows = workspace_rows(&profile(), false);
        assert_eq!(rows[0].apps, "Xcode, Terminal");
        assert_eq!(rows[0].focus, "Xcode");
        assert_eq!(rows[0].shortcut, "cmd+opt+1");
        assert_eq!(rows[1].focus, "-");
        assert_eq!(rows[1].shortcut, "-");
    }

    #[test]
    fn test_rows_summarize_long_app_lists() {
        let mut profile = profile();
        let names = ["Messages", "Mail", "Slack", "Discord", "Telegram", "WhatsApp", "Zoom"];
        profile.workspaces[1].apps = names
            .into_iter()
            .map(|name| AppRef::new(name, format!("com.example.{name}")))
            .collect();

        let rows = workspace_rows(&profile, false);
        assert_eq!(rows[1].apps, "Messages, Mail, Slack, Discord, Telegram, +2");
    }

    #[test]
    fn test_rows_hide_display_in_dynamic_mode() {
        let rows = workspace_rows(&profile(), true);
        assert!(rows.iter().all(|row| row.display == "(dynamic)"));
    }

    #[test]
    fn test_select_profile_by_name() {
        let config = SpacesConfig {
            profiles: vec![ProfileConfig::default(), profile()],
            ..SpacesConfig::default()
        };

        assert_eq!(select_profile(&config, Some("Work")).unwrap().name, "Work");
        assert!(matches!(
            select_profile(&config, Some("Missing")),
            Err(SpacesError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_select_profile_without_profiles() {
        let config = SpacesConfig::default();
        assert!(matches!(select_profile(&config, None), Err(SpacesError::ConfigError(_))));
    }
}

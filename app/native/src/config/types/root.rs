//! Root configuration structure and file loading.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::settings::Settings;
use super::workspaces::ProfileConfig;

/// Root configuration structure for Spaces.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct SpacesConfig {
    /// Name of the profile loaded at startup.
    /// If empty or unknown, the first profile is used.
    pub active_profile: String,

    /// Named workspace lists.
    pub profiles: Vec<ProfileConfig>,

    /// Switching behavior shared by all profiles.
    pub settings: Settings,
}

impl SpacesConfig {
    /// Returns the profile selected by `active_profile`, or the first one.
    #[must_use]
    pub fn active_profile(&self) -> Option<&ProfileConfig> {
        self.profile(&self.active_profile).or_else(|| self.profiles.first())
    }

    /// Finds a profile by name (case-insensitive).
    #[must_use]
    pub fn profile(&self, name: &str) -> Option<&ProfileConfig> {
        self.profiles.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Checks the invariants the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found:
    /// duplicate workspace ids or names inside a profile, duplicate apps inside
    /// a workspace, or a Picture-in-Picture title regex that does not compile.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for profile in &self.profiles {
            let mut names = HashSet::new();
            let mut ids = HashSet::new();

            for workspace in &profile.workspaces {
                if !names.insert(workspace.name.to_lowercase()) {
                    return Err(ConfigError::Invalid(format!(
                        "profile '{}' has more than one workspace named '{}'",
                        profile.name, workspace.name
                    )));
                }

                if let Some(id) = workspace.id
                    && !ids.insert(id)
                {
                    return Err(ConfigError::Invalid(format!(
                        "profile '{}' has more than one workspace with id {id}",
                        profile.name
                    )));
                }

                for (i, app) in workspace.apps.iter().enumerate() {
                    if workspace.apps[..i].contains(app) {
                        return Err(ConfigError::Invalid(format!(
                            "workspace '{}' lists app '{app}' more than once",
                            workspace.name
                        )));
                    }
                }
            }
        }

        for app in &self.settings.picture_in_picture.apps {
            if let Err(err) = Regex::new(&app.pip_window_title_regex) {
                return Err(ConfigError::Invalid(format!(
                    "invalid PiP title regex for '{}': {err}",
                    app.bundle_identifier
                )));
            }
        }

        Ok(())
    }
}

/// Errors that can occur when loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error(
        "No configuration file found. Expected at ~/.config/spaces/config.jsonc, \
         ~/Library/Application Support/spaces/config.jsonc, or ~/.spaces.jsonc"
    )]
    NotFound,
    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),
    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] serde_json::Error),
    /// The configuration file parsed but breaks an invariant.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Legacy configuration file names in home directory.
const LEGACY_CONFIG_FILE_NAMES: &[&str] = &[".spaces.jsonc", ".spaces.json"];

/// Returns the possible configuration file paths in priority order.
///
/// The function checks the following locations (both `.jsonc` and `.json` variants):
/// 1. `~/.config/spaces/config.jsonc` or `config.json`
/// 2. `~/Library/Application Support/spaces/config.jsonc` or `config.json` (macOS native)
/// 3. `~/.spaces.jsonc` or `~/.spaces.json` (legacy/simple location)
///
/// If `$XDG_CONFIG_HOME` is set, it takes priority over `~/.config`.
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let spaces_dir = PathBuf::from(xdg_config).join("spaces");
        for filename in CONFIG_FILE_NAMES {
            paths.push(spaces_dir.join(filename));
        }
    }

    if let Some(home) = dirs::home_dir() {
        let spaces_dir = home.join(".config").join("spaces");
        for filename in CONFIG_FILE_NAMES {
            let path = spaces_dir.join(filename);
            // XDG_CONFIG_HOME might be ~/.config
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let spaces_dir = config_dir.join("spaces");
        for filename in CONFIG_FILE_NAMES {
            let path = spaces_dir.join(filename);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    if let Some(home) = dirs::home_dir() {
        for filename in LEGACY_CONFIG_FILE_NAMES {
            paths.push(home.join(filename));
        }
    }

    paths
}

/// Loads the configuration from the first available config file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of the expected locations.
/// Returns `ConfigError::IoError` if a configuration file exists but could not be read.
/// Returns `ConfigError::ParseError` if the configuration file contains invalid JSON.
/// Returns `ConfigError::Invalid` if the configuration breaks an invariant.
pub fn load_config() -> Result<(SpacesConfig, PathBuf), ConfigError> {
    for path in config_paths() {
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    Err(ConfigError::NotFound)
}

/// Loads the configuration from a specific file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist, and the same
/// errors as [`load_config`] otherwise.
pub fn load_config_from_path(path: &Path) -> Result<(SpacesConfig, PathBuf), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }

    let file = fs::File::open(path)?;
    let reader = json_comments::StripComments::new(file);
    let config: SpacesConfig = serde_json::from_reader(reader)?;
    config.validate()?;

    Ok((config, path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::config::types::workspaces::{AppRef, WorkspaceConfig};
    use crate::config::types::settings::PipAppConfig;

    fn profile_with(workspaces: Vec<WorkspaceConfig>) -> SpacesConfig {
        SpacesConfig {
            profiles: vec![ProfileConfig { name: "Default".to_string(), workspaces }],
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config_is_empty() {
        let config = SpacesConfig::default();
        assert!(config.profiles.is_empty());
        assert!(config.active_profile().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_active_profile_falls_back_to_first() {
        let mut config = profile_with(vec![]);
        config.profiles.push(ProfileConfig { name: "Work".to_string(), workspaces: vec![] });

        assert_eq!(config.active_profile().unwrap().name, "Default");

        config.active_profile = "work".to_string();
        assert_eq!(config.active_profile().unwrap().name, "Work");

        config.active_profile = "missing".to_string();
        assert_eq!(config.active_profile().unwrap().name, "Default");
    }

    #[test]
    fn test_validate_rejects_duplicate_names() {
        let config = profile_with(vec![
            WorkspaceConfig::new("Dev", "main"),
            WorkspaceConfig::new("dev", "main"),
        ]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("more than one workspace named"));
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let id = uuid::Uuid::now_v7();
        let mut a = WorkspaceConfig::new("A", "main");
        a.id = Some(id);
        let mut b = WorkspaceConfig::new("B", "main");
        b.id = Some(id);

        let err = profile_with(vec![a, b]).validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_validate_rejects_duplicate_apps() {
        let mut ws = WorkspaceConfig::new("Comms", "main");
        ws.apps = vec![
            AppRef::new("Slack", "com.tinyspeck.slackmacgap"),
            AppRef::new("Slack", "com.tinyspeck.slackmacgap"),
        ];
        let err = profile_with(vec![ws]).validate().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_validate_rejects_bad_pip_regex() {
        let mut config = SpacesConfig::default();
        config.settings.picture_in_picture.apps.push(PipAppConfig {
            name: "Player".to_string(),
            bundle_identifier: "com.example.player".to_string(),
            pip_window_title_regex: "([unclosed".to_string(),
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("invalid PiP title regex"));
    }

    #[test]
    fn test_config_paths_are_not_empty() {
        assert!(!config_paths().is_empty());
    }

    #[test]
    fn test_load_config_from_path_strips_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{
                // profiles
                "profiles": [{{
                    "name": "Default",
                    "workspaces": [{{ "name": "Dev", "display": "main" }}] /* one */
                }}],
                "settings": {{ "displayMode": "dynamic" }}
            }}"#
        )
        .unwrap();

        let (config, path) = load_config_from_path(file.path()).unwrap();
        assert_eq!(path, file.path());
        assert_eq!(config.profiles[0].workspaces[0].name, "Dev");
        assert!(config.settings.is_dynamic());
    }

    #[test]
    fn test_load_config_from_missing_path() {
        let err = load_config_from_path(Path::new("/nonexistent/spaces.json")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound));
    }

    #[test]
    fn test_load_config_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{ not json").unwrap();
        let err = load_config_from_path(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}

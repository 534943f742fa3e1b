//! Behavior settings for workspace switching.
//!
//! Everything here is read-only from the engine's perspective: the engine
//! receives a copy when it is constructed or when the profile is replaced.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::workspaces::AppRef;

/// How workspaces are bound to displays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Each workspace is pinned to its configured display.
    #[default]
    Static,
    /// A workspace occupies whichever displays its running apps are on.
    Dynamic,
}

/// A user-defined Picture-in-Picture capable application.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct PipAppConfig {
    /// Display name of the app.
    pub name: String,

    /// Bundle identifier of the app.
    pub bundle_identifier: String,

    /// Regular expression matched against window titles to find the PiP window.
    pub pip_window_title_regex: String,
}

/// Picture-in-Picture support settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct PictureInPictureConfig {
    /// Whether apps showing a PiP window are relocated instead of hidden.
    /// Default: true
    pub enabled: bool,

    /// Distance in pixels between the relocated windows and the screen edges.
    /// Default: 15
    pub screen_corner_offset: u32,

    /// Additional PiP capable apps beyond the built-in browser list.
    pub apps: Vec<PipAppConfig>,
}

impl Default for PictureInPictureConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            screen_corner_offset: 15,
            apps: Vec::new(),
        }
    }
}

/// Helper function for default file manager value.
fn default_file_manager() -> String { "com.apple.finder".to_string() }

/// Workspace switching behavior.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)] // Settings are independent toggles
pub struct Settings {
    /// Static or dynamic display binding.
    /// Default: "static"
    pub display_mode: DisplayMode,

    /// Fallback displays, as semicolon separated `source=target` pairs.
    /// Example: "DELL U2720Q=Built-in Retina Display;LG HDR 4K=DELL U2720Q"
    pub alternative_displays: String,

    /// Activate the target workspace right after assigning an app to it.
    /// Default: true
    pub change_workspace_on_app_assign: bool,

    /// Leave apps that belong to no workspace visible when switching.
    /// Default: false
    pub keep_unassigned_apps_on_switch: bool,

    /// Activate an app's workspace when the user focuses it manually.
    /// Default: true
    pub activate_workspace_on_focus_change: bool,

    /// Wrap around when cycling past the first or last workspace.
    /// Default: true
    pub loop_workspaces: bool,

    /// Skip workspaces without running apps when cycling.
    /// Default: false
    pub skip_empty_workspaces_on_switch: bool,

    /// Move the pointer to the focused window after a workspace switch.
    /// Default: false
    pub center_cursor_on_workspace_change: bool,

    /// Move the pointer to the focused window after a directional focus change.
    /// Default: false
    pub center_cursor_on_focus_change: bool,

    /// Skip windows fully covered by other windows when moving focus.
    /// Experimental: relies on the window server's stacking order.
    /// Default: false
    pub focus_frontmost_window: bool,

    /// Apps visible on every workspace of their display.
    pub floating_apps: Vec<AppRef>,

    /// Picture-in-Picture support.
    pub picture_in_picture: PictureInPictureConfig,

    /// Bundle identifier of the app focused when nothing else qualifies.
    /// Default: "com.apple.finder"
    #[serde(default = "default_file_manager")]
    pub file_manager_bundle_id: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_mode: DisplayMode::Static,
            alternative_displays: String::new(),
            change_workspace_on_app_assign: true,
            keep_unassigned_apps_on_switch: false,
            activate_workspace_on_focus_change: true,
            loop_workspaces: true,
            skip_empty_workspaces_on_switch: false,
            center_cursor_on_workspace_change: false,
            center_cursor_on_focus_change: false,
            focus_frontmost_window: false,
            floating_apps: Vec::new(),
            picture_in_picture: PictureInPictureConfig::default(),
            file_manager_bundle_id: default_file_manager(),
        }
    }
}

impl Settings {
    /// Returns whether displays are bound dynamically.
    #[must_use]
    pub fn is_dynamic(&self) -> bool { self.display_mode == DisplayMode::Dynamic }

    /// Parses `alternative_displays` into `(source, target)` pairs.
    ///
    /// Malformed entries (missing `=`, empty sides) are skipped.
    #[must_use]
    pub fn alternative_display_pairs(&self) -> Vec<(String, String)> {
        self.alternative_displays
            .split(';')
            .filter_map(|pair| {
                let (source, target) = pair.split_once('=')?;
                let (source, target) = (source.trim(), target.trim());
                if source.is_empty() || target.is_empty() {
                    None
                } else {
                    Some((source.to_string(), target.to_string()))
                }
            })
            .collect()
    }
}

//! Workspace and profile configuration types.
//!
//! Configuration for workspace definitions, the apps they group, and the
//! named profiles that hold them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reference to an application, as stored in the configuration.
///
/// Two references are equal when their bundle identifiers match, or when
/// both identifiers are empty and the names match. Records with an empty
/// bundle identifier are written by older versions; use [`AppRef::refers_to`]
/// to match them against a full reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct AppRef {
    /// Display name (e.g., "Safari").
    pub name: String,

    /// Bundle identifier (e.g., "com.apple.Safari").
    pub bundle_identifier: String,

    /// Optional path to the app icon, used by menu-bar renderers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_path: Option<String>,
}

impl AppRef {
    /// Creates a reference from a display name and a bundle identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, bundle_identifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bundle_identifier: bundle_identifier.into(),
            icon_path: None,
        }
    }

    /// Returns the key used for equality: the bundle identifier, or the
    /// display name when the identifier is empty.
    #[must_use]
    pub fn identity(&self) -> &str {
        if self.bundle_identifier.is_empty() { &self.name } else { &self.bundle_identifier }
    }

    /// Checks whether this reference names the given bundle identifier / name pair.
    ///
    /// An empty identifier on either side falls back to the name, so this is
    /// looser than `==` and not transitive.
    #[must_use]
    pub fn matches(&self, name: &str, bundle_identifier: &str) -> bool {
        if self.bundle_identifier.is_empty() || bundle_identifier.is_empty() {
            self.name == name
        } else {
            self.bundle_identifier == bundle_identifier
        }
    }
}

impl AppRef {
    /// Loose comparison that accepts legacy records without an identifier.
    #[must_use]
    pub fn refers_to(&self, other: &Self) -> bool {
        self.matches(&other.name, &other.bundle_identifier)
    }
}

impl PartialEq for AppRef {
    fn eq(&self, other: &Self) -> bool {
        match (self.bundle_identifier.is_empty(), other.bundle_identifier.is_empty()) {
            (true, true) => self.name == other.name,
            (false, false) => self.bundle_identifier == other.bundle_identifier,
            _ => false,
        }
    }
}

impl Eq for AppRef {}

impl std::fmt::Display for AppRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.bundle_identifier.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.bundle_identifier)
        }
    }
}

/// Helper function for default display value.
fn default_display() -> String { "main".to_string() }

/// Workspace configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfig {
    /// Stable identifier. Generated when missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    /// Name of the workspace, unique within a profile.
    pub name: String,

    /// Display assignment: "main"/"primary" or a display name.
    /// Ignored when `displayMode` is `dynamic`.
    /// Default: "main"
    #[serde(default = "default_display")]
    pub display: String,

    /// Shortcut that activates the workspace (e.g., "cmd+opt+1").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activate_shortcut: Option<String>,

    /// Shortcut that assigns the focused app to the workspace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assign_app_shortcut: Option<String>,

    /// Apps grouped in this workspace, in preferred stacking order.
    #[serde(default)]
    pub apps: Vec<AppRef>,

    /// App that always receives focus when the workspace is activated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_to_focus: Option<AppRef>,

    /// SF Symbol name shown by menu-bar renderers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl WorkspaceConfig {
    /// Creates a workspace configuration bound to a display.
    #[must_use]
    pub fn new(name: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            display: display.into(),
            activate_shortcut: None,
            assign_app_shortcut: None,
            apps: Vec::new(),
            app_to_focus: None,
            icon: None,
        }
    }
}

/// A named list of workspaces. Exactly one profile is active at a time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileConfig {
    /// Profile name.
    pub name: String,

    /// Workspaces of this profile, in switching order.
    pub workspaces: Vec<WorkspaceConfig>,
}

//! Centralized event definitions for workspace collaborators.
//!
//! Events leave the engine as [`EngineEvent`] values on a broadcast channel.
//! Integrations that need a string name (menu bar, shell hooks) use
//! [`EngineEvent::name`], which follows the pattern `spaces://<module>/<event-name>`.

use serde::Serialize;
use uuid::Uuid;

use crate::modules::workspaces::state::DisplayId;

/// Workspace related event names.
pub mod workspaces {
    /// Emitted after a workspace was activated on a display.
    ///
    /// Payload: `{ workspaceId, workspaceName, display }`
    pub const ACTIVATED: &str = "spaces://workspaces/activated";

    /// Emitted when a workspace's app list or the floating set changed.
    ///
    /// Payload: `()` (no payload)
    pub const APPS_LIST_CHANGED: &str = "spaces://workspaces/apps-list-changed";

    /// Emitted when the active profile was switched or reloaded.
    ///
    /// Payload: `String` - The profile name.
    pub const PROFILE_CHANGED: &str = "spaces://workspaces/profile-changed";
}

/// An event emitted by the workspace engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum EngineEvent {
    /// A workspace became the active one on `display`.
    #[serde(rename_all = "camelCase")]
    WorkspaceActivated {
        workspace_id: Uuid,
        workspace_name: String,
        display: DisplayId,
    },
    /// App assignments or floating apps changed.
    AppsListChanged,
    /// A different profile is now active.
    #[serde(rename_all = "camelCase")]
    ProfileChanged { profile: String },
}

impl EngineEvent {
    /// Returns the event name used by external integrations.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::WorkspaceActivated { .. } => workspaces::ACTIVATED,
            Self::AppsListChanged => workspaces::APPS_LIST_CHANGED,
            Self::ProfileChanged { .. } => workspaces::PROFILE_CHANGED,
        }
    }
}

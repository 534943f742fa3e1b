//! Message types for the state actor.
//!
//! All communication with the state actor happens through messages:
//! - `StateMessage` - events and commands sent to the actor
//! - `Command` - user-facing operations that report success or failure
//! - `StateQuery` - requests for state data (with response channel)
//! - `QueryResult` - responses from queries

use eyeball::Subscriber;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::config::{AppRef, SpacesConfig};
use crate::error::SpacesResult;
use crate::modules::workspaces::engine::Timer;
use crate::modules::workspaces::state::{
    ActiveMap, CycleDirection, Direction, Pid, Workspace, WorkspaceRef,
};

// ============================================================================
// State Messages
// ============================================================================

/// Messages sent to the state actor.
pub enum StateMessage {
    // ════════════════════════════════════════════════════════════════════════
    // Commands (from CLI, hotkeys)
    // ════════════════════════════════════════════════════════════════════════
    /// Run a command, optionally reporting its outcome.
    Execute {
        command: Command,
        respond_to: Option<oneshot::Sender<SpacesResult<()>>>,
    },

    // ════════════════════════════════════════════════════════════════════════
    // Window system events
    // ════════════════════════════════════════════════════════════════════════
    /// An app became frontmost.
    AppActivated { pid: Pid },

    /// A relocated app moved focus off its PiP window.
    PipFocusLost { pid: Pid },

    /// An app process exited.
    AppTerminated { pid: Pid, app: AppRef },

    /// Displays were connected, removed or rearranged.
    DisplaysChanged,

    // ════════════════════════════════════════════════════════════════════════
    // Internal
    // ════════════════════════════════════════════════════════════════════════
    /// The configuration file changed on disk.
    ConfigReloaded(Box<SpacesConfig>),

    /// A timer requested by the engine elapsed.
    TimerFired(Timer),

    /// Execute a query and send result back.
    Query {
        query: StateQuery,
        respond_to: oneshot::Sender<QueryResult>,
    },

    /// Subscribe to the active workspace map.
    SubscribeActive { respond_to: oneshot::Sender<Subscriber<ActiveMap>> },

    /// Restore relocated windows and stop the actor.
    Shutdown,
}

impl StateMessage {
    /// Returns a human-readable name for this message type.
    ///
    /// Used for logging, especially in panic recovery.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Execute { command, .. } => command.name(),
            Self::AppActivated { .. } => "AppActivated",
            Self::PipFocusLost { .. } => "PipFocusLost",
            Self::AppTerminated { .. } => "AppTerminated",
            Self::DisplaysChanged => "DisplaysChanged",
            Self::ConfigReloaded(_) => "ConfigReloaded",
            Self::TimerFired(_) => "TimerFired",
            Self::Query { .. } => "Query",
            Self::SubscribeActive { .. } => "SubscribeActive",
            Self::Shutdown => "Shutdown",
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Operations exposed to the CLI and hotkey layer.
///
/// An omitted app means the frontmost app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Activate(WorkspaceRef),
    ActivateRelative {
        direction: CycleDirection,
        skip_empty: Option<bool>,
    },
    ActivateRecent,
    AssignApp {
        app: Option<AppRef>,
        workspace: Option<WorkspaceRef>,
    },
    UnassignApp(Option<AppRef>),
    FloatApp(Option<AppRef>),
    UnfloatApp(Option<AppRef>),
    Focus(Direction),
    CycleApp(CycleDirection),
    CycleWindow(CycleDirection),
    SwitchProfile(String),
}

impl Command {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Activate(_) => "Activate",
            Self::ActivateRelative { .. } => "ActivateRelative",
            Self::ActivateRecent => "ActivateRecent",
            Self::AssignApp { .. } => "AssignApp",
            Self::UnassignApp(_) => "UnassignApp",
            Self::FloatApp(_) => "FloatApp",
            Self::UnfloatApp(_) => "UnfloatApp",
            Self::Focus(_) => "Focus",
            Self::CycleApp(_) => "CycleApp",
            Self::CycleWindow(_) => "CycleWindow",
            Self::SwitchProfile(_) => "SwitchProfile",
        }
    }
}

// ============================================================================
// Queries
// ============================================================================

/// Queries that can be executed against the state.
#[derive(Debug, Clone)]
pub enum StateQuery {
    ActiveWorkspaces,
    MostRecentWorkspaces,
    Workspaces,
    ActiveProfile,
    LastFocusedApp { workspace_id: Uuid },
    RelocatedApps,
}

/// Results from queries.
#[derive(Debug, Clone)]
pub enum QueryResult {
    Displays(ActiveMap),
    Workspaces(Vec<Workspace>),
    Profile(String),
    App(Option<AppRef>),
    Pids(Vec<Pid>),
}

impl QueryResult {
    /// Try to get a display to workspace map from the result.
    #[must_use]
    pub fn into_displays(self) -> Option<ActiveMap> {
        match self {
            Self::Displays(map) => Some(map),
            _ => None,
        }
    }

    /// Try to get workspaces from the result.
    #[must_use]
    pub fn into_workspaces(self) -> Option<Vec<Workspace>> {
        match self {
            Self::Workspaces(workspaces) => Some(workspaces),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_profile(self) -> Option<String> {
        match self {
            Self::Profile(name) => Some(name),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_app(self) -> Option<Option<AppRef>> {
        match self {
            Self::App(app) => Some(app),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_pids(self) -> Option<Vec<Pid>> {
        match self {
            Self::Pids(pids) => Some(pids),
            _ => None,
        }
    }
}

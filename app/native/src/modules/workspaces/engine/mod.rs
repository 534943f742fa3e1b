//! The workspace engine.
//!
//! A synchronous state machine that owns [`EngineState`] and the
//! [`PipGuard`], and drives the window system through [`WindowSystem`].
//! Deferred work never runs inside the engine: it is queued as a [`Timer`]
//! and handed back by the actor when it fires. Every timer carries a token,
//! and only the most recently issued token of each kind is honoured, which
//! makes scheduling a new timer cancel the pending one.
//!
//! Handlers are split by concern:
//! - `activation` - workspace activation, delayed rehide, deferred activation
//! - `assign` - assigning, unassigning and floating apps
//! - `tracker` - reacting to app activation events
//! - `focus` - directional focus and app/window cycling
//! - `navigation` - next/previous/recent workspace
//! - `lifecycle` - profiles, displays, config reload, termination, shutdown

mod activation;
mod assign;
mod focus;
mod lifecycle;
mod navigation;
mod tracker;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

pub use activation::ActivationPlan;

use super::clock::Clock;
use super::display;
use super::pip::PipGuard;
use super::platform::WindowSystem;
use super::state::{
    Display, DisplayId, EngineState, Pid, Point, RunningApp, WindowInfo, Workspace, WorkspaceRef,
    display_at_point, display_for_frame,
};
use crate::config::{AppRef, SpacesConfig};
use crate::error::{SpacesError, SpacesResult};
use crate::events::EngineEvent;

/// Delay before hidden apps are checked and hidden again.
pub const REHIDE_DELAY: Duration = Duration::from_millis(200);

/// Delay before retrying activation of a dynamic workspace without displays.
pub const DEFERRED_ACTIVATION_DELAY: Duration = Duration::from_millis(500);

/// App activation events this soon after an engine activation are ignored.
pub const FOCUS_COOLDOWN: Duration = Duration::from_millis(200);

/// Deferred work requested by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timer {
    /// Hide again whatever the last activation failed to hide.
    Rehide { token: u64, workspace_id: Uuid },
    /// Retry activating a dynamic workspace once its apps report windows.
    DeferredActivation {
        token: u64,
        workspace_id: Uuid,
        set_focus: bool,
    },
}

impl Timer {
    #[must_use]
    pub const fn delay(&self) -> Duration {
        match self {
            Self::Rehide { .. } => REHIDE_DELAY,
            Self::DeferredActivation { .. } => DEFERRED_ACTIVATION_DELAY,
        }
    }

    #[must_use]
    pub const fn token(&self) -> u64 {
        match self {
            Self::Rehide { token, .. } | Self::DeferredActivation { token, .. } => *token,
        }
    }
}

/// Window system state captured once per operation.
pub struct Snapshot {
    pub displays: Vec<Display>,
    /// Running apps with a regular activation policy.
    pub apps: Vec<RunningApp>,
    windows: HashMap<Pid, Vec<WindowInfo>>,
    /// Display of the key window, if any.
    pub key_display: Option<DisplayId>,
}

impl Snapshot {
    /// Query the window system.
    pub fn capture(ws: &dyn WindowSystem) -> Self {
        let displays = ws.displays();
        let apps: Vec<RunningApp> = ws.running_apps().into_iter().filter(RunningApp::is_regular).collect();
        let windows = apps.iter().map(|app| (app.pid, ws.app_windows(app.pid))).collect();
        let key_display = ws
            .focused_window()
            .and_then(|w| display_for_frame(&w.frame, &displays).map(|d| d.id.clone()));

        Self {
            displays,
            apps,
            windows,
            key_display,
        }
    }

    #[must_use]
    pub fn windows(&self, pid: Pid) -> &[WindowInfo] {
        self.windows.get(&pid).map(Vec::as_slice).unwrap_or_default()
    }

    /// Displays hosting at least one visible window of the app, in connected order.
    #[must_use]
    pub fn app_displays(&self, pid: Pid) -> Vec<DisplayId> {
        let windows = self.windows(pid);
        self.displays
            .iter()
            .filter(|d| {
                windows.iter().any(|w| {
                    !w.is_minimized
                        && display_for_frame(&w.frame, &self.displays).is_some_and(|wd| wd.id == d.id)
                })
            })
            .map(|d| d.id.clone())
            .collect()
    }

    /// First running app matching `app`.
    #[must_use]
    pub fn app(&self, app: &AppRef) -> Option<&RunningApp> { self.apps.iter().find(|a| a.is(app)) }

    #[must_use]
    pub fn app_by_pid(&self, pid: Pid) -> Option<&RunningApp> {
        self.apps.iter().find(|a| a.pid == pid)
    }

    #[must_use]
    pub fn display(&self, id: &DisplayId) -> Option<&Display> {
        self.displays.iter().find(|d| &d.id == id)
    }
}

/// The workspace engine.
pub struct Engine {
    ws: Arc<dyn WindowSystem>,
    clock: Arc<dyn Clock>,
    state: EngineState,
    pip: PipGuard,
    events: Vec<EngineEvent>,
    timers: Vec<Timer>,
    next_token: u64,
    pending_rehide: Option<u64>,
    pending_deferred: Option<u64>,
}

impl Engine {
    /// Create an engine for a loaded configuration.
    #[must_use]
    pub fn new(config: &SpacesConfig, ws: Arc<dyn WindowSystem>, clock: Arc<dyn Clock>) -> Self {
        Self {
            ws,
            clock,
            state: EngineState::new(config),
            pip: PipGuard::new(&config.settings.picture_in_picture),
            events: Vec::new(),
            timers: Vec::new(),
            next_token: 0,
            pending_rehide: None,
            pending_deferred: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &EngineState { &self.state }

    #[must_use]
    pub const fn pip(&self) -> &PipGuard { &self.pip }

    /// Events produced since the last call.
    pub fn take_events(&mut self) -> Vec<EngineEvent> { std::mem::take(&mut self.events) }

    /// Timers requested since the last call.
    pub fn take_timers(&mut self) -> Vec<Timer> { std::mem::take(&mut self.timers) }

    /// Dispatch a fired timer. Stale tokens are ignored.
    pub fn on_timer(&mut self, timer: Timer) {
        match timer {
            Timer::Rehide { token, workspace_id } => {
                if self.pending_rehide != Some(token) {
                    tracing::trace!(token, "spaces: ignoring superseded rehide");
                    return;
                }
                self.pending_rehide = None;
                self.rehide(workspace_id);
            }
            Timer::DeferredActivation {
                token,
                workspace_id,
                set_focus,
            } => {
                if self.pending_deferred != Some(token) {
                    tracing::trace!(token, "spaces: ignoring superseded deferred activation");
                    return;
                }
                self.pending_deferred = None;
                self.activate_workspace_inner(workspace_id, set_focus, true);
            }
        }
    }

    // ========================================================================
    // Shared helpers
    // ========================================================================

    fn ensure_trusted(&self) -> SpacesResult<()> {
        if self.ws.is_trusted() {
            Ok(())
        } else {
            Err(SpacesError::AccessibilityDenied)
        }
    }

    fn lookup(&self, reference: &WorkspaceRef) -> SpacesResult<Uuid> {
        self.state.find_workspace(reference).map(|w| w.id).ok_or_else(|| {
            tracing::debug!(workspace = %reference, "spaces: workspace not found");
            SpacesError::WorkspaceNotFound(reference.to_string())
        })
    }

    fn issue_token(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }

    fn emit(&mut self, event: EngineEvent) { self.events.push(event); }

    fn is_static(&self) -> bool { !self.state.settings.is_dynamic() }

    /// Resolve a workspace's configured display.
    fn resolve_display(&self, workspace: &Workspace, snapshot: &Snapshot) -> Option<DisplayId> {
        display::resolve(
            &workspace.display,
            &snapshot.displays,
            &self.state.settings.alternative_display_pairs(),
            snapshot.key_display.as_ref(),
        )
    }

    /// The display the user is working on: key window, then pointer, then primary.
    fn current_display(&self, snapshot: &Snapshot) -> Option<DisplayId> {
        snapshot
            .key_display
            .clone()
            .or_else(|| self.cursor_display(snapshot))
            .or_else(|| display::main_display(&snapshot.displays).map(|d| d.id.clone()))
    }

    fn cursor_display(&self, snapshot: &Snapshot) -> Option<DisplayId> {
        let cursor = self.ws.cursor_location()?;
        display_at_point(cursor, &snapshot.displays).map(|d| d.id.clone())
    }

    /// Unhide an app and raise its visible windows.
    fn show_app(&self, app: &RunningApp, snapshot: &Snapshot) {
        if app.is_hidden
            && let Err(err) = self.ws.unhide_app(app.pid)
        {
            tracing::warn!(app = %app.name, error = %err, "spaces: failed to unhide app");
        }

        for window in snapshot.windows(app.pid).iter().rev().filter(|w| !w.is_minimized) {
            if let Err(err) = self.ws.raise_window(window.id) {
                tracing::warn!(app = %app.name, window = window.id, error = %err, "spaces: failed to raise window");
            }
        }
    }

    /// Hide an app unless it is already hidden.
    fn hide_app(&self, app: &RunningApp) {
        if app.is_hidden {
            return;
        }
        if let Err(err) = self.ws.hide_app(app.pid) {
            tracing::warn!(app = %app.name, error = %err, "spaces: failed to hide app");
        }
    }

    /// Give keyboard focus to an app.
    fn focus_app(&self, app: &RunningApp) -> bool {
        match self.ws.activate_app(app.pid) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(app = %app.name, error = %err, "spaces: failed to focus app");
                false
            }
        }
    }

    fn warp_cursor(&self, point: Point) {
        if let Err(err) = self.ws.warp_cursor(point) {
            tracing::debug!(error = %err, "spaces: failed to move cursor");
        }
    }
}

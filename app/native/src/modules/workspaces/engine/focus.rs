//! Directional focus and cycling through the current workspace.

use std::cmp::Ordering;

use super::navigation::step;
use super::{Engine, Snapshot};
use crate::error::{SpacesError, SpacesResult};
use crate::modules::workspaces::state::{
    CycleDirection, Direction, Pid, Rect, RunningApp, WindowInfo, Workspace,
};

/// True when `candidate` lies in `direction` from `focused`.
fn is_towards(direction: Direction, focused: &Rect, candidate: &Rect) -> bool {
    match direction {
        Direction::Right => candidate.max_x() > focused.max_x() && candidate.vertical_overlap(focused),
        Direction::Left => candidate.min_x() < focused.min_x() && candidate.vertical_overlap(focused),
        Direction::Down => candidate.max_y() > focused.max_y() && candidate.horizontal_overlap(focused),
        Direction::Up => candidate.min_y() < focused.min_y() && candidate.horizontal_overlap(focused),
    }
}

/// True when a window above `candidate` in `stack` covers it completely.
///
/// Windows of `focused_pid` never count as covering.
fn is_obscured(candidate: &WindowInfo, stack: &[WindowInfo], focused_pid: Pid) -> bool {
    stack
        .iter()
        .take_while(|w| w.id != candidate.id)
        .any(|w| w.pid != focused_pid && w.frame.contains_rect(&candidate.frame))
}

impl Engine {
    /// Move focus to the nearest window in `direction`.
    ///
    /// Having no window in that direction is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if accessibility access is missing or no window is focused.
    pub fn focus_direction(&mut self, direction: Direction) -> SpacesResult<()> {
        self.ensure_trusted()?;

        let focused = self.ws.focused_window().ok_or(SpacesError::NoFocusedApp)?;
        let snapshot = Snapshot::capture(self.ws.as_ref());

        let mut candidates: Vec<(&RunningApp, &WindowInfo)> = snapshot
            .apps
            .iter()
            .filter(|app| !app.is_hidden)
            .flat_map(|app| snapshot.windows(app.pid).iter().map(move |w| (app, w)))
            .filter(|(_, w)| {
                !w.is_minimized && w.id != focused.id && is_towards(direction, &focused.frame, &w.frame)
            })
            .collect();

        let origin = focused.frame.center();
        candidates.sort_by(|(_, a), (_, b)| {
            a.frame.center().distance(&origin).total_cmp(&b.frame.center().distance(&origin))
        });

        let Some(&nearest) = candidates.first() else {
            tracing::debug!(?direction, "spaces: no window in that direction");
            return Ok(());
        };

        let (app, window) = if self.state.settings.focus_frontmost_window {
            match self.ws.window_stack() {
                Ok(stack) => candidates
                    .iter()
                    .copied()
                    .find(|(_, w)| !is_obscured(w, &stack, focused.pid))
                    .unwrap_or(nearest),
                Err(err) => {
                    tracing::debug!(error = %err, "spaces: window order unavailable");
                    nearest
                }
            }
        } else {
            nearest
        };

        self.focus_window_of(app, window);
        if self.state.settings.center_cursor_on_focus_change {
            self.warp_cursor(window.frame.center());
        }
        Ok(())
    }

    /// Focus the next or previous app of the current workspace.
    ///
    /// The cycle is the workspace's apps in configured order followed by the
    /// floating apps sharing its display, restricted to running apps.
    ///
    /// # Errors
    ///
    /// Returns an error if accessibility access is missing or no workspace
    /// is active where the user is working.
    pub fn cycle_app(&mut self, direction: CycleDirection) -> SpacesResult<()> {
        self.ensure_trusted()?;

        let snapshot = Snapshot::capture(self.ws.as_ref());
        let workspace = self.current_workspace(&snapshot)?;
        let apps = self.cycle_apps(&workspace, &snapshot);

        let frontmost = self.ws.frontmost_app().map(|app| app.pid);
        let current = apps.iter().position(|app| Some(app.pid) == frontmost);
        let Some(target) = step(current, apps.len(), direction, true) else {
            return Ok(());
        };

        let app = apps[target];
        self.show_app(app, &snapshot);
        if self.focus_app(app) {
            self.state.set_last_focused(workspace.id, app.to_app_ref());
        }
        Ok(())
    }

    /// Focus the next or previous window of the current workspace.
    ///
    /// Windows of one app are visited in title order, then by leftmost
    /// position. Past an app's last window the cycle continues with the
    /// next app, wrapping around the whole workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if accessibility access is missing or no workspace
    /// is active where the user is working.
    pub fn cycle_window(&mut self, direction: CycleDirection) -> SpacesResult<()> {
        self.ensure_trusted()?;

        let snapshot = Snapshot::capture(self.ws.as_ref());
        let workspace = self.current_workspace(&snapshot)?;

        let windows: Vec<(&RunningApp, &WindowInfo)> = self
            .cycle_apps(&workspace, &snapshot)
            .into_iter()
            .flat_map(|app| {
                let mut windows: Vec<&WindowInfo> =
                    snapshot.windows(app.pid).iter().filter(|w| !w.is_minimized).collect();
                windows.sort_by(|a, b| match natord::compare(&a.title, &b.title) {
                    Ordering::Equal => a.frame.x.total_cmp(&b.frame.x),
                    order => order,
                });
                windows.into_iter().map(move |w| (app, w))
            })
            .collect();

        let focused = self.ws.focused_window().map(|w| w.id);
        let current = windows.iter().position(|(_, w)| Some(w.id) == focused);
        let Some(target) = step(current, windows.len(), direction, true) else {
            return Ok(());
        };

        let (app, window) = windows[target];
        if app.is_hidden
            && let Err(err) = self.ws.unhide_app(app.pid)
        {
            tracing::warn!(app = %app.name, error = %err, "spaces: failed to unhide app");
        }
        self.focus_window_of(app, window);
        self.state.set_last_focused(workspace.id, app.to_app_ref());
        Ok(())
    }

    /// Workspace active where the user is working.
    fn current_workspace(&self, snapshot: &Snapshot) -> SpacesResult<Workspace> {
        let frontmost = self.ws.frontmost_app();
        let on_display = self.current_display(snapshot).and_then(|d| self.state.active_on(&d));
        let owning_frontmost = || {
            let front = frontmost.as_ref()?;
            self.state
                .active_workspaces()
                .into_values()
                .find(|id| self.state.workspace(*id).is_some_and(|w| front.is_any(&w.apps)))
        };

        on_display
            .or_else(owning_frontmost)
            .and_then(|id| self.state.workspace(id).cloned())
            .ok_or(SpacesError::NoActiveWorkspace)
    }

    /// Running apps cycled through for `workspace`.
    fn cycle_apps<'a>(&self, workspace: &Workspace, snapshot: &'a Snapshot) -> Vec<&'a RunningApp> {
        let displays = self.state.displays_of(workspace.id);
        let file_manager = &self.state.settings.file_manager_bundle_id;

        let members = workspace.apps.iter().filter_map(|app| snapshot.app(app));
        let floating = self
            .state
            .floating
            .iter()
            .filter(|app| !workspace.contains_app(app))
            .filter_map(|app| snapshot.app(app))
            .filter(|app| &app.bundle_id != file_manager)
            .filter(|app| {
                snapshot.displays.len() < 2
                    || snapshot.app_displays(app.pid).iter().any(|d| displays.contains(d))
            });

        let mut apps: Vec<&RunningApp> = Vec::new();
        for app in members.chain(floating) {
            if !apps.iter().any(|a| a.pid == app.pid) {
                apps.push(app);
            }
        }
        apps
    }

    /// Raise a window and give its app keyboard focus.
    fn focus_window_of(&self, app: &RunningApp, window: &WindowInfo) {
        if let Err(err) = self.ws.raise_window(window.id) {
            tracing::warn!(app = %app.name, window = window.id, error = %err, "spaces: failed to raise window");
        }
        self.focus_app(app);
    }
}

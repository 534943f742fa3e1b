//! Assigning apps to workspaces and toggling floating apps.
//!
//! App lists live in the engine's copy of the active profile. Every change
//! emits `AppsListChanged` so the owner of the configuration can persist it.

use uuid::Uuid;

use super::{Engine, Snapshot};
use crate::config::AppRef;
use crate::error::{SpacesError, SpacesResult};
use crate::events::EngineEvent;
use crate::modules::workspaces::display;
use crate::modules::workspaces::state::{RunningApp, WorkspaceRef};

impl Engine {
    /// Move an app into a workspace.
    ///
    /// `app` defaults to the frontmost app. `workspace` defaults to the
    /// workspace active on the app's display.
    ///
    /// # Errors
    ///
    /// Returns an error if accessibility access is missing, there is no
    /// frontmost app, or the workspace cannot be found.
    pub fn assign_app(
        &mut self,
        app: Option<AppRef>,
        workspace: Option<&WorkspaceRef>,
    ) -> SpacesResult<()> {
        self.ensure_trusted()?;

        let snapshot = Snapshot::capture(self.ws.as_ref());
        let app = self.app_or_frontmost(app)?;
        let target = match workspace {
            Some(reference) => self.lookup(reference)?,
            None => self.workspace_for_app_display(&app, &snapshot)?,
        };

        let previous = self
            .active_workspace_of_app(&app, &snapshot)
            .or_else(|| self.active_workspace_around_app(&app, &snapshot));
        let previous_index = previous
            .and_then(|id| self.state.workspace(id))
            .and_then(|w| w.apps.iter().position(|a| a.refers_to(&app)));

        for workspace in self.state.workspaces_mut() {
            workspace.apps.retain(|a| !a.refers_to(&app));
        }
        if let Some(workspace) = self.state.workspace_mut(target) {
            tracing::info!(app = %app, workspace = %workspace.name, "spaces: assigned app");
            workspace.apps.push(app.clone());
        }
        self.state.set_last_focused(target, app.clone());
        self.emit(EngineEvent::AppsListChanged);

        if self.state.settings.change_workspace_on_app_assign {
            self.activate_workspace(target, true);
        } else if !self.state.is_active(target) {
            if let Some(running) = snapshot.app(&app) {
                self.hide_app(running);
            }
            if let Some(previous) = previous {
                self.focus_next_in_workspace(previous, previous_index, &snapshot);
            }
        }

        Ok(())
    }

    /// Remove an app from every workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if accessibility access is missing, there is no
    /// frontmost app, or no workspace lists the app.
    pub fn unassign_app(&mut self, app: Option<AppRef>) -> SpacesResult<()> {
        self.ensure_trusted()?;
        let app = self.app_or_frontmost(app)?;

        if !self.state.is_assigned(&app) {
            return Err(SpacesError::AppNotFound(app.to_string()));
        }

        for workspace in self.state.workspaces_mut() {
            workspace.apps.retain(|a| !a.refers_to(&app));
        }
        self.state.forget_last_focused(&app);
        self.emit(EngineEvent::AppsListChanged);
        tracing::info!(app = %app, "spaces: unassigned app");
        Ok(())
    }

    /// Make an app visible on every workspace of its display.
    ///
    /// # Errors
    ///
    /// Returns an error if accessibility access is missing or there is no
    /// frontmost app.
    pub fn float_app(&mut self, app: Option<AppRef>) -> SpacesResult<()> {
        self.ensure_trusted()?;
        let app = self.app_or_frontmost(app)?;

        if !self.state.is_floating(&app) {
            tracing::info!(app = %app, "spaces: floating app");
            self.state.floating.push(app);
            self.emit(EngineEvent::AppsListChanged);
        }
        Ok(())
    }

    /// Stop floating an app. It is hidden unless the active workspace of its
    /// display lists it.
    ///
    /// # Errors
    ///
    /// Returns an error if accessibility access is missing, there is no
    /// frontmost app, or the app is not floating.
    pub fn unfloat_app(&mut self, app: Option<AppRef>) -> SpacesResult<()> {
        self.ensure_trusted()?;
        let app = self.app_or_frontmost(app)?;

        if !self.state.is_floating(&app) {
            return Err(SpacesError::AppNotFound(app.to_string()));
        }

        self.state.floating.retain(|a| !a.refers_to(&app));
        self.emit(EngineEvent::AppsListChanged);
        tracing::info!(app = %app, "spaces: unfloated app");

        let snapshot = Snapshot::capture(self.ws.as_ref());
        if let Some(running) = snapshot.app(&app) {
            let visible = snapshot.app_displays(running.pid).iter().any(|display| {
                self.state
                    .active_on(display)
                    .and_then(|id| self.state.workspace(id))
                    .is_some_and(|w| w.contains_app(&app))
            });
            if !visible {
                self.hide_app(running);
            }
        }
        Ok(())
    }

    fn app_or_frontmost(&self, app: Option<AppRef>) -> SpacesResult<AppRef> {
        match app {
            Some(app) => Ok(app),
            None => self
                .ws
                .frontmost_app()
                .filter(RunningApp::is_regular)
                .map(|app| app.to_app_ref())
                .ok_or(SpacesError::NoFocusedApp),
        }
    }

    /// Workspace active on the display an app lives on.
    ///
    /// Among several candidate displays the most recently focused wins, then
    /// the one under the pointer.
    fn workspace_for_app_display(&self, app: &AppRef, snapshot: &Snapshot) -> SpacesResult<Uuid> {
        let mut candidates = snapshot.app(app).map(|a| snapshot.app_displays(a.pid)).unwrap_or_default();
        if candidates.is_empty() {
            candidates.extend(self.current_display(snapshot));
        }

        let cursor = self.cursor_display(snapshot);
        let chosen = display::select_candidate(&candidates, self.state.display_history(), cursor.as_ref())
            .ok_or(SpacesError::NoActiveWorkspace)?;

        self.state.active_on(&chosen).ok_or(SpacesError::NoActiveWorkspace)
    }

    /// Active workspace currently listing the app.
    fn active_workspace_of_app(&self, app: &AppRef, snapshot: &Snapshot) -> Option<Uuid> {
        let displays = snapshot.app(app).map(|a| snapshot.app_displays(a.pid)).unwrap_or_default();
        let owns = |id: &Uuid| self.state.workspace(*id).is_some_and(|w| w.contains_app(app));

        displays
            .iter()
            .filter_map(|d| self.state.active_on(d))
            .find(owns)
            .or_else(|| self.state.active_workspaces().into_values().find(owns))
    }

    /// Workspace active on the app's display, or where the user is working
    /// when the app has no windows.
    fn active_workspace_around_app(&self, app: &AppRef, snapshot: &Snapshot) -> Option<Uuid> {
        let displays = snapshot.app(app).map(|a| snapshot.app_displays(a.pid)).unwrap_or_default();

        displays
            .iter()
            .find_map(|d| self.state.active_on(d))
            .or_else(|| self.current_display(snapshot).and_then(|d| self.state.active_on(&d)))
    }

    /// Focus the running app at or after `from` in a workspace, wrapping.
    fn focus_next_in_workspace(&self, id: Uuid, from: Option<usize>, snapshot: &Snapshot) {
        let Some(workspace) = self.state.workspace(id) else {
            return;
        };

        let running: Vec<&RunningApp> =
            workspace.apps.iter().filter_map(|a| snapshot.app(a)).collect();
        if running.is_empty() {
            return;
        }

        let start = from.unwrap_or(0);
        let next = workspace
            .apps
            .iter()
            .cycle()
            .skip(start)
            .take(workspace.apps.len())
            .find_map(|a| snapshot.app(a));

        if let Some(app) = next {
            self.show_app(app, snapshot);
            self.focus_app(app);
        }
    }
}

//! Workspace activation.
//!
//! Activation shows the workspace's apps (focus target last), hides every
//! other app on the workspace's displays, records the new active workspace
//! and schedules a rehide pass for hides that completed asynchronously.

use uuid::Uuid;

use super::{Engine, Snapshot, Timer};
use crate::error::SpacesResult;
use crate::events::EngineEvent;
use crate::modules::workspaces::state::{DisplayId, Pid, Workspace, WorkspaceRef};

/// Apps to show, hide and focus for one activation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivationPlan {
    /// Displays the workspace occupies.
    pub displays: Vec<DisplayId>,
    /// Workspace apps in configured order, then floating apps.
    pub show: Vec<Pid>,
    pub hide: Vec<Pid>,
    pub focus: Option<Pid>,
}

impl Engine {
    /// Activate a workspace and focus one of its apps.
    ///
    /// # Errors
    ///
    /// Returns an error if accessibility access is missing or the workspace
    /// does not exist.
    pub fn activate(&mut self, reference: &WorkspaceRef) -> SpacesResult<()> {
        self.ensure_trusted()?;
        let id = self.lookup(reference)?;
        self.activate_workspace(id, true);
        Ok(())
    }

    pub(super) fn activate_workspace(&mut self, id: Uuid, set_focus: bool) {
        self.activate_workspace_inner(id, set_focus, false);
    }

    /// `deferred` is set when a previous attempt already waited for the
    /// workspace's apps to report windows.
    pub(super) fn activate_workspace_inner(&mut self, id: Uuid, set_focus: bool, deferred: bool) {
        let Some(workspace) = self.state.workspace(id).cloned() else {
            tracing::debug!(%id, "spaces: workspace vanished before activation");
            return;
        };

        self.pending_deferred = None;
        self.state.last_activation = Some(self.clock.now());
        let snapshot = Snapshot::capture(self.ws.as_ref());

        let mut displays = self.workspace_displays(&workspace, &snapshot);
        if displays.is_empty() {
            if !deferred && self.schedule_deferred_activation(&workspace, &snapshot, set_focus) {
                return;
            }
            displays = self.current_display(&snapshot).into_iter().collect();
        }

        if displays.is_empty() {
            tracing::warn!(workspace = %workspace.name, "spaces: no display connected, skipping activation");
            return;
        }

        self.remember_frontmost(&displays);

        let plan = self.plan_activation(&workspace, &snapshot, &displays, set_focus);
        self.apply_plan(&workspace, &plan, &snapshot);

        for display in &plan.displays {
            self.state.set_active(display, id);
        }
        self.state.retain_active_displays(id, &plan.displays);

        let token = self.issue_token();
        self.pending_rehide = Some(token);
        self.timers.push(Timer::Rehide { token, workspace_id: id });

        for display in &plan.displays {
            self.emit(EngineEvent::WorkspaceActivated {
                workspace_id: id,
                workspace_name: workspace.name.clone(),
                display: display.clone(),
            });
        }

        if set_focus && self.state.settings.center_cursor_on_workspace_change {
            self.center_cursor(&plan, &snapshot);
        }

        tracing::info!(
            workspace = %workspace.name,
            displays = ?plan.displays,
            shown = plan.show.len(),
            hidden = plan.hide.len(),
            "spaces: activated workspace"
        );
    }

    /// Displays a workspace occupies.
    ///
    /// Static mode resolves the configured display; dynamic mode collects
    /// the displays hosting the workspace's running apps.
    pub(super) fn workspace_displays(
        &self,
        workspace: &Workspace,
        snapshot: &Snapshot,
    ) -> Vec<DisplayId> {
        if self.is_static() {
            return self.resolve_display(workspace, snapshot).into_iter().collect();
        }

        let occupied: Vec<DisplayId> = snapshot
            .apps
            .iter()
            .filter(|app| app.is_any(&workspace.apps))
            .flat_map(|app| snapshot.app_displays(app.pid))
            .collect();

        snapshot
            .displays
            .iter()
            .map(|d| d.id.clone())
            .filter(|id| occupied.contains(id))
            .collect()
    }

    /// Unhide a dynamic workspace's apps and retry once they have windows.
    ///
    /// Returns `false` when there is nothing to wait for.
    fn schedule_deferred_activation(
        &mut self,
        workspace: &Workspace,
        snapshot: &Snapshot,
        set_focus: bool,
    ) -> bool {
        if self.is_static() {
            return false;
        }

        let mut waiting = false;
        for app in snapshot.apps.iter().filter(|app| app.is_any(&workspace.apps)) {
            self.show_app(app, snapshot);
            waiting = true;
        }
        if !waiting {
            return false;
        }

        let token = self.issue_token();
        self.pending_deferred = Some(token);
        self.timers.push(Timer::DeferredActivation {
            token,
            workspace_id: workspace.id,
            set_focus,
        });
        tracing::debug!(workspace = %workspace.name, "spaces: waiting for windows before activation");
        true
    }

    /// Record the frontmost app as last focused for the workspace it belongs to.
    fn remember_frontmost(&mut self, displays: &[DisplayId]) {
        let Some(front) = self.ws.frontmost_app() else {
            return;
        };

        for display in displays {
            let Some(previous) = self.state.active_on(display) else {
                continue;
            };
            let owns_front =
                self.state.workspace(previous).is_some_and(|w| front.is_any(&w.apps));
            if owns_front {
                self.state.set_last_focused(previous, front.to_app_ref());
            }
        }
    }

    /// Compute what an activation would do, without side effects.
    #[must_use]
    pub fn plan_activation(
        &self,
        workspace: &Workspace,
        snapshot: &Snapshot,
        displays: &[DisplayId],
        set_focus: bool,
    ) -> ActivationPlan {
        let settings = &self.state.settings;
        let multi_display = snapshot.displays.len() > 1;
        let on_displays = |pid: Pid| {
            !multi_display || snapshot.app_displays(pid).iter().any(|d| displays.contains(d))
        };

        let mut show: Vec<Pid> = Vec::new();
        for pid in workspace.apps.iter().filter_map(|app| snapshot.app(app)).map(|app| app.pid) {
            if !show.contains(&pid) {
                show.push(pid);
            }
        }
        for app in &snapshot.apps {
            if app.is_any(&self.state.floating)
                && !show.contains(&app.pid)
                && on_displays(app.pid)
            {
                show.push(app.pid);
            }
        }

        let focus = if set_focus { self.focus_target(workspace, snapshot, &show) } else { None };

        let hide = snapshot
            .apps
            .iter()
            .filter(|app| {
                !app.is_any(&workspace.apps)
                    && !app.is_any(&self.state.floating)
                    && Some(app.pid) != focus
                    && !(settings.keep_unassigned_apps_on_switch
                        && !self.state.workspaces().iter().any(|w| app.is_any(&w.apps)))
                    && on_displays(app.pid)
            })
            .map(|app| app.pid)
            .collect();

        ActivationPlan {
            displays: displays.to_vec(),
            show,
            hide,
            focus,
        }
    }

    /// Pick the app that receives keyboard focus.
    ///
    /// Order: configured `app_to_focus`, the workspace's last focused app,
    /// the last running app in the list, the file manager.
    fn focus_target(&self, workspace: &Workspace, snapshot: &Snapshot, show: &[Pid]) -> Option<Pid> {
        if let Some(app) = workspace.app_to_focus.as_ref().and_then(|a| snapshot.app(a)) {
            return Some(app.pid);
        }

        if let Some(app) = self.state.last_focused(workspace.id).and_then(|a| snapshot.app(a))
            && show.contains(&app.pid)
        {
            return Some(app.pid);
        }

        if let Some(app) = workspace.apps.iter().rev().find_map(|a| snapshot.app(a)) {
            return Some(app.pid);
        }

        let file_manager = &self.state.settings.file_manager_bundle_id;
        snapshot.apps.iter().find(|a| &a.bundle_id == file_manager).map(|a| a.pid)
    }

    fn apply_plan(&mut self, workspace: &Workspace, plan: &ActivationPlan, snapshot: &Snapshot) {
        for pid in &plan.show {
            self.pip.restore(self.ws.as_ref(), *pid);
        }

        for app in plan
            .show
            .iter()
            .filter(|pid| Some(**pid) != plan.focus)
            .filter_map(|pid| snapshot.app_by_pid(*pid))
        {
            self.show_app(app, snapshot);
        }

        if let Some(app) = plan.focus.and_then(|pid| snapshot.app_by_pid(pid)) {
            self.show_app(app, snapshot);
            if self.focus_app(app) {
                self.state.set_last_focused(workspace.id, app.to_app_ref());
            }
        }

        let static_mode = self.is_static();
        for app in plan.hide.iter().filter_map(|pid| snapshot.app_by_pid(*pid)) {
            let windows = snapshot.windows(app.pid);
            if self.pip.should_relocate(app, windows, &snapshot.displays, static_mode) {
                self.pip.relocate(self.ws.as_ref(), app, windows, &snapshot.displays);
            } else {
                self.hide_app(app);
            }
        }
    }

    /// Hide again what the last activation of `id` could not hide.
    pub(super) fn rehide(&mut self, id: Uuid) {
        let displays = self.state.displays_of(id);
        if displays.is_empty() {
            return;
        }
        let Some(workspace) = self.state.workspace(id).cloned() else {
            return;
        };

        let snapshot = Snapshot::capture(self.ws.as_ref());
        let plan = self.plan_activation(&workspace, &snapshot, &displays, false);
        let frontmost = self.ws.frontmost_app().map(|app| app.pid);
        let static_mode = self.is_static();

        for app in plan.hide.iter().filter_map(|pid| snapshot.app_by_pid(*pid)) {
            if app.is_hidden || Some(app.pid) == frontmost || self.pip.is_relocated(app.pid) {
                continue;
            }

            let windows = snapshot.windows(app.pid);
            if self.pip.should_relocate(app, windows, &snapshot.displays, static_mode) {
                self.pip.relocate(self.ws.as_ref(), app, windows, &snapshot.displays);
            } else {
                tracing::debug!(app = %app.name, "spaces: hiding app again");
                self.hide_app(app);
            }
        }
    }

    fn center_cursor(&self, plan: &ActivationPlan, snapshot: &Snapshot) {
        let point = plan
            .focus
            .and_then(|pid| snapshot.windows(pid).iter().find(|w| !w.is_minimized))
            .map(|w| w.frame.center())
            .or_else(|| {
                plan.displays
                    .first()
                    .and_then(|d| snapshot.display(d))
                    .map(|d| d.visible_frame.center())
            });

        if let Some(point) = point {
            self.warp_cursor(point);
        }
    }
}

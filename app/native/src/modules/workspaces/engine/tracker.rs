//! Focused-window tracking.
//!
//! Consumes "app activated" events from the window system. Events arriving
//! within [`FOCUS_COOLDOWN`] of the engine's own activation are echoes of
//! its raise/focus calls and are dropped.

use uuid::Uuid;

use super::{Engine, FOCUS_COOLDOWN, Snapshot};
use crate::modules::workspaces::state::{DisplayId, Pid, display_for_frame};

impl Engine {
    /// Handle an app becoming frontmost.
    pub fn on_app_activated(&mut self, pid: Pid) {
        let now = self.clock.now();
        if self.state.last_activation.is_some_and(|t| now.duration_since(t) < FOCUS_COOLDOWN) {
            tracing::trace!(pid, "spaces: ignoring activation during cooldown");
            return;
        }

        let restored = self.pip.restore(self.ws.as_ref(), pid);
        let snapshot = Snapshot::capture(self.ws.as_ref());
        let Some(app) = snapshot.app_by_pid(pid).cloned() else {
            return;
        };
        if restored {
            tracing::debug!(app = %app.name, "spaces: app regained focus, restored PiP windows");
        }

        let focused_on = self.display_of_focused_window(pid, &snapshot);
        if let Some(focused_on) = &focused_on {
            self.state.record_display_focus(focused_on);
        }

        let app_ref = app.to_app_ref();
        if let Some(id) = self.active_workspace_listing(pid, focused_on.as_ref(), &snapshot) {
            self.state.set_last_focused(id, app_ref);
            return;
        }

        if self.state.is_floating(&app_ref) || !self.state.settings.activate_workspace_on_focus_change {
            return;
        }

        let Some(id) = self.owning_workspace(pid, focused_on.as_ref(), &snapshot) else {
            return;
        };

        tracing::debug!(app = %app.name, "spaces: focus moved to another workspace");
        self.state.set_last_focused(id, app_ref);
        self.activate_workspace(id, false);
    }

    /// Handle a relocated app moving focus off its PiP window.
    ///
    /// The app's windows are put back and the workspace owning it is
    /// activated with focus.
    pub fn on_pip_focus_lost(&mut self, pid: Pid) {
        if !self.pip.restore(self.ws.as_ref(), pid) {
            return;
        }

        let snapshot = Snapshot::capture(self.ws.as_ref());
        let focused_on = self.display_of_focused_window(pid, &snapshot);
        let Some(id) = self.owning_workspace(pid, focused_on.as_ref(), &snapshot) else {
            return;
        };
        if let Some(app) = snapshot.app_by_pid(pid) {
            self.state.set_last_focused(id, app.to_app_ref());
        }
        self.activate_workspace(id, true);
    }

    fn display_of_focused_window(&self, pid: Pid, snapshot: &Snapshot) -> Option<DisplayId> {
        let focused = self.ws.focused_window().filter(|w| w.pid == pid);
        let frame = focused
            .map(|w| w.frame)
            .or_else(|| snapshot.windows(pid).iter().find(|w| !w.is_minimized).map(|w| w.frame))?;
        display_for_frame(&frame, &snapshot.displays).map(|d| d.id.clone())
    }

    /// Active workspace listing the app, preferring the one on `display`.
    fn active_workspace_listing(
        &self,
        pid: Pid,
        display: Option<&DisplayId>,
        snapshot: &Snapshot,
    ) -> Option<Uuid> {
        let app = snapshot.app_by_pid(pid)?;
        let lists = |id: &Uuid| self.state.workspace(*id).is_some_and(|w| app.is_any(&w.apps));

        display
            .and_then(|d| self.state.active_on(d))
            .filter(lists)
            .or_else(|| self.state.active_workspaces().into_values().find(lists))
    }

    /// Workspace an app belongs to, preferring one assigned to `display`.
    fn owning_workspace(
        &self,
        pid: Pid,
        display: Option<&DisplayId>,
        snapshot: &Snapshot,
    ) -> Option<Uuid> {
        let app = snapshot.app_by_pid(pid)?;
        let owners: Vec<_> =
            self.state.workspaces().iter().filter(|w| app.is_any(&w.apps)).collect();

        owners
            .iter()
            .find(|w| {
                display.is_some_and(|d| {
                    self.is_static() && self.resolve_display(w, snapshot).as_ref() == Some(d)
                })
            })
            .or_else(|| owners.first())
            .map(|w| w.id)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use crate::config::Settings;
    use crate::modules::workspaces::state::Rect;

    #[test]
    fn test_activation_inside_cooldown_is_ignored() {
        let mut h = harness();
        h.activate("W1");
        h.ws.set_frontmost(MAIL);

        h.engine.on_app_activated(MAIL);

        assert_eq!(h.engine.state().last_focused(h.id("W1")), Some(&slack()));
    }

    #[test]
    fn test_focus_inside_active_workspace_updates_last_focused() {
        let mut h = harness();
        h.activate("W1");
        h.settle();
        h.ws.set_frontmost(MAIL);

        h.engine.on_app_activated(MAIL);

        assert_eq!(h.engine.state().last_focused(h.id("W1")), Some(&mail()));
        assert_eq!(h.active_on("Main"), Some(h.id("W1")));
    }

    #[test]
    fn test_focus_on_other_workspace_activates_it_without_focus() {
        let mut h = harness();
        h.activate("W1");
        h.settle();
        h.ws.set_frontmost(XCODE);
        h.ws.clear_calls();

        h.engine.on_app_activated(XCODE);

        assert_eq!(h.active_on("Main"), Some(h.id("W2")));
        assert!(h.ws.activated().is_empty());
        assert!(h.ws.is_hidden(MAIL));
        assert_eq!(h.engine.state().last_focused(h.id("W2")), Some(&xcode()));
    }

    #[test]
    fn test_focus_change_activation_can_be_disabled() {
        let mut config = default_config();
        config.settings.activate_workspace_on_focus_change = false;
        let mut h = harness_with(&config, single_display_world());
        h.activate("W1");
        h.settle();

        h.engine.on_app_activated(XCODE);

        assert_eq!(h.active_on("Main"), Some(h.id("W1")));
    }

    #[test]
    fn test_floating_and_unassigned_apps_do_not_switch() {
        let mut config = default_config();
        config.settings.floating_apps = vec![xcode()];
        let mut h = harness_with(&config, single_display_world());
        h.activate("W1");
        h.settle();

        h.engine.on_app_activated(XCODE);
        h.engine.on_app_activated(FINDER);

        assert_eq!(h.active_on("Main"), Some(h.id("W1")));
    }

    #[test]
    fn test_focus_regained_restores_pip_windows() {
        let ws = single_display_world();
        ws.add_window(CHROME, 6, "Picture in Picture", Rect::new(1100.0, 700.0, 320.0, 180.0));
        let mut h = harness_with(&default_config(), ws);
        h.activate("W1");
        assert!(h.engine.pip().is_relocated(CHROME));
        h.settle();

        h.engine.on_app_activated(CHROME);

        assert!(!h.engine.pip().is_relocated(CHROME));
        assert_eq!(h.active_on("Main"), Some(h.id("W3")));
    }

    #[test]
    fn test_pip_focus_lost_switches_back() {
        let ws = single_display_world();
        ws.add_window(CHROME, 6, "Picture in Picture", Rect::new(1100.0, 700.0, 320.0, 180.0));
        let mut h = harness_with(&default_config(), ws);
        h.activate("W1");
        assert!(h.ws.is_observing_focus(CHROME));

        h.engine.on_pip_focus_lost(CHROME);

        assert!(!h.engine.pip().is_relocated(CHROME));
        assert!(!h.ws.is_observing_focus(CHROME));
        assert_eq!(h.active_on("Main"), Some(h.id("W3")));
        assert_eq!(h.ws.frontmost(), Some(CHROME));
    }

    #[test]
    fn test_pip_focus_lost_for_untracked_app_is_ignored() {
        let mut h = harness();
        h.activate("W1");

        h.engine.on_pip_focus_lost(CHROME);

        assert_eq!(h.active_on("Main"), Some(h.id("W1")));
    }

    #[test]
    fn test_records_display_focus_history() {
        let ws = single_display_world();
        ws.add_display("Side", Rect::new(1440.0, 0.0, 1920.0, 1080.0), false);
        ws.add_window(XCODE, 8, "Other", Rect::new(1600.0, 100.0, 400.0, 300.0));
        let config = config_with(vec![workspace("A", "Main", vec![mail()])], Settings::default());
        let mut h = harness_with(&config, ws);

        h.ws.focus_window(8);
        h.engine.on_app_activated(XCODE);
        h.ws.focus_window(1);
        h.engine.on_app_activated(MAIL);

        let history: Vec<&str> =
            h.engine.state().display_history().iter().map(|d| d.as_str()).collect();
        assert_eq!(history, vec!["Side", "Main"]);
    }
}

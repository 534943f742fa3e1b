//! Moving between workspaces: next, previous and most recent.

use uuid::Uuid;

use super::{Engine, Snapshot};
use crate::error::{SpacesError, SpacesResult};
use crate::modules::workspaces::state::{CycleDirection, DisplayId};

impl Engine {
    /// Activate the next or previous workspace of the current display.
    ///
    /// `skip_empty` overrides the `skipEmptyWorkspacesOnSwitch` setting.
    /// Without `loopWorkspaces`, stepping past either end is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if accessibility access is missing or no workspace
    /// belongs to the current display.
    pub fn activate_relative(
        &mut self,
        direction: CycleDirection,
        skip_empty: Option<bool>,
    ) -> SpacesResult<()> {
        self.ensure_trusted()?;

        let snapshot = Snapshot::capture(self.ws.as_ref());
        let screen = self.current_display(&snapshot).ok_or(SpacesError::NoActiveWorkspace)?;
        let skip_empty = skip_empty.unwrap_or(self.state.settings.skip_empty_workspaces_on_switch);
        let wrap = self.state.settings.loop_workspaces;

        let candidates: Vec<Uuid> = self
            .state
            .workspaces()
            .iter()
            .filter(|w| {
                !self.is_static() || self.resolve_display(w, &snapshot).as_ref() == Some(&screen)
            })
            .filter(|w| {
                !skip_empty
                    || self.state.active_on(&screen) == Some(w.id)
                    || snapshot.apps.iter().any(|app| app.is_any(&w.apps))
            })
            .map(|w| w.id)
            .collect();

        if candidates.is_empty() {
            tracing::debug!(display = %screen, "spaces: no workspace to switch to");
            return Err(SpacesError::WorkspaceNotFound(format!("{direction:?} on {screen}")));
        }

        let current = self.state.active_on(&screen).and_then(|id| candidates.iter().position(|c| *c == id));
        let Some(target) = step(current, candidates.len(), direction, wrap) else {
            return Ok(());
        };

        let id = candidates[target];
        if Some(target) != current {
            self.activate_workspace(id, true);
        }
        Ok(())
    }

    /// Activate the workspace shown before the current one on the current display.
    ///
    /// # Errors
    ///
    /// Returns an error if accessibility access is missing or there is no
    /// previous workspace.
    pub fn activate_recent(&mut self) -> SpacesResult<()> {
        self.ensure_trusted()?;

        let snapshot = Snapshot::capture(self.ws.as_ref());
        let screen = self.current_display(&snapshot).ok_or(SpacesError::NoActiveWorkspace)?;
        let id = self.recent_workspace(&screen).ok_or_else(|| {
            tracing::debug!(display = %screen, "spaces: no recent workspace");
            SpacesError::WorkspaceNotFound("recent".to_string())
        })?;

        self.activate_workspace(id, true);
        Ok(())
    }

    fn recent_workspace(&self, display: &DisplayId) -> Option<Uuid> {
        self.state.most_recent_on(display).filter(|id| self.state.workspace(*id).is_some())
    }
}

/// Index reached by stepping once from `current` in a list of `len` items.
///
/// With no current index, `Next` starts at the first item and `Previous` at
/// the last one.
pub(super) fn step(current: Option<usize>, len: usize, direction: CycleDirection, wrap: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }

    match (current, direction) {
        (None, CycleDirection::Next) => Some(0),
        (None, CycleDirection::Previous) => Some(len - 1),
        (Some(i), CycleDirection::Next) if i + 1 < len => Some(i + 1),
        (Some(_), CycleDirection::Next) => wrap.then_some(0),
        (Some(i), CycleDirection::Previous) if i > 0 => Some(i - 1),
        (Some(_), CycleDirection::Previous) => wrap.then_some(len - 1),
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::config::Settings;
    use crate::modules::workspaces::state::Rect;

    #[test]
    fn test_step() {
        assert_eq!(step(None, 3, CycleDirection::Next, false), Some(0));
        assert_eq!(step(None, 3, CycleDirection::Previous, false), Some(2));
        assert_eq!(step(Some(1), 3, CycleDirection::Next, false), Some(2));
        assert_eq!(step(Some(2), 3, CycleDirection::Next, false), None);
        assert_eq!(step(Some(2), 3, CycleDirection::Next, true), Some(0));
        assert_eq!(step(Some(0), 3, CycleDirection::Previous, true), Some(2));
        assert_eq!(step(Some(0), 0, CycleDirection::Next, true), None);
    }

    #[test]
    fn test_next_and_previous_cycle() {
        let mut h = harness();
        h.activate("W1");

        h.engine.activate_relative(CycleDirection::Next, None).unwrap();
        assert_eq!(h.active_on("Main"), Some(h.id("W2")));

        h.engine.activate_relative(CycleDirection::Previous, None).unwrap();
        assert_eq!(h.active_on("Main"), Some(h.id("W1")));

        h.engine.activate_relative(CycleDirection::Previous, None).unwrap();
        assert_eq!(h.active_on("Main"), Some(h.id("W3")));
    }

    #[test]
    fn test_no_loop_stops_at_end() {
        let mut config = default_config();
        config.settings.loop_workspaces = false;
        let mut h = harness_with(&config, single_display_world());
        h.activate("W3");
        h.ws.clear_calls();

        h.engine.activate_relative(CycleDirection::Next, None).unwrap();

        assert_eq!(h.active_on("Main"), Some(h.id("W3")));
        assert!(h.ws.calls().is_empty());
    }

    #[test]
    fn test_skip_empty_workspaces() {
        let ws = single_display_world();
        ws.remove_app(XCODE);
        let mut h = harness_with(&default_config(), ws);
        h.activate("W1");

        h.engine.activate_relative(CycleDirection::Next, Some(true)).unwrap();
        assert_eq!(h.active_on("Main"), Some(h.id("W3")));

        h.engine.activate_relative(CycleDirection::Previous, Some(false)).unwrap();
        assert_eq!(h.active_on("Main"), Some(h.id("W2")));
    }

    #[test]
    fn test_static_mode_cycles_within_display() {
        let ws = single_display_world();
        ws.add_display("Side", Rect::new(1440.0, 0.0, 1920.0, 1080.0), false);
        let config = config_with(
            vec![
                workspace("A", "Main", vec![mail()]),
                workspace("B", "Side", vec![xcode()]),
                workspace("C", "Main", vec![slack()]),
            ],
            Settings::default(),
        );
        let mut h = harness_with(&config, ws);
        h.activate("A");

        h.engine.activate_relative(CycleDirection::Next, None).unwrap();

        assert_eq!(h.active_on("Main"), Some(h.id("C")));
        assert_eq!(h.active_on("Side"), None);
    }

    #[test]
    fn test_recent_without_history() {
        let mut h = harness();
        h.activate("W1");
        let result = h.engine.activate_recent();
        assert_eq!(result, Err(SpacesError::WorkspaceNotFound("recent".to_string())));
    }

    #[test]
    fn test_recent_toggles() {
        let mut h = harness();
        h.activate("W1");
        h.activate("W3");

        h.engine.activate_recent().unwrap();
        assert_eq!(h.active_on("Main"), Some(h.id("W1")));

        h.engine.activate_recent().unwrap();
        assert_eq!(h.active_on("Main"), Some(h.id("W3")));
    }
}

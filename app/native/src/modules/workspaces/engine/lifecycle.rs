//! Profiles, display topology, config reloads and process lifecycle.

use super::{Engine, Snapshot};
use crate::config::{AppRef, SpacesConfig};
use crate::error::{SpacesError, SpacesResult};
use crate::events::EngineEvent;
use crate::modules::workspaces::state::{ActiveMap, DisplayId, Pid};

impl Engine {
    /// Make another profile active.
    ///
    /// Nothing is shown or hidden; the next activation applies the new
    /// profile's workspaces.
    ///
    /// # Errors
    ///
    /// Returns an error if no profile has that name.
    pub fn switch_profile(&mut self, name: &str) -> SpacesResult<()> {
        if !self.state.switch_profile(name) {
            tracing::debug!(profile = name, "spaces: profile not found");
            return Err(SpacesError::InvalidArguments(format!("unknown profile '{name}'")));
        }

        self.pending_rehide = None;
        self.pending_deferred = None;

        let profile = self.state.profile().name.clone();
        tracing::info!(%profile, "spaces: switched profile");
        self.emit(EngineEvent::ProfileChanged { profile });
        Ok(())
    }

    /// Re-map active workspaces after displays were connected or removed.
    ///
    /// Static workspaces follow their resolved display. Dynamic workspaces
    /// keep connected displays and otherwise move to a display hosting one
    /// of their apps. Entries that map nowhere are dropped.
    pub fn on_displays_changed(&mut self) {
        let snapshot = Snapshot::capture(self.ws.as_ref());
        let connected: Vec<DisplayId> = snapshot.displays.iter().map(|d| d.id.clone()).collect();

        let mut next = ActiveMap::new();
        for (screen, id) in self.state.active_workspaces() {
            let Some(workspace) = self.state.workspace(id) else {
                continue;
            };

            let target = if self.is_static() {
                self.resolve_display(workspace, &snapshot)
            } else if connected.contains(&screen) {
                Some(screen.clone())
            } else {
                self.workspace_displays(workspace, &snapshot)
                    .into_iter()
                    .find(|d| !next.contains_key(d))
            };

            match target {
                Some(target) => {
                    next.entry(target).or_insert(id);
                }
                None => {
                    tracing::debug!(workspace = %workspace.name, display = %screen, "spaces: dropping active workspace");
                }
            }
        }

        self.state.replace_active(next);
        self.state.retain_most_recent(|display, _| connected.contains(display));
        tracing::info!(displays = ?connected, "spaces: display configuration changed");
    }

    /// Apply a reloaded configuration file.
    pub fn on_config_reloaded(&mut self, config: &SpacesConfig) {
        self.state.replace_config(config);
        self.pip.update_config(&config.settings.picture_in_picture);

        let profile = self.state.profile().name.clone();
        tracing::info!(%profile, workspaces = self.state.workspaces().len(), "spaces: configuration reloaded");
        self.emit(EngineEvent::ProfileChanged { profile });
        self.emit(EngineEvent::AppsListChanged);
    }

    /// Forget a terminated process.
    ///
    /// Its windows are gone, so relocation records are dropped rather than
    /// restored.
    pub fn on_app_terminated(&mut self, pid: Pid, app: &AppRef) {
        self.pip.forget(self.ws.as_ref(), pid);
        self.state.forget_last_focused(app);
    }

    /// Put every relocated window back before the process exits.
    pub fn shutdown(&mut self) {
        if !self.pip.is_empty() {
            tracing::info!("spaces: restoring relocated windows");
        }
        self.pip.restore_all(self.ws.as_ref());
    }
}

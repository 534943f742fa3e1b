//! The `EngineState` struct owned by the workspace actor.
//!
//! Holds the active profile, the per-display active/most-recent workspace
//! maps and the recency side tables. The active map is observable so the
//! menu bar can follow it without polling.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use eyeball::{Observable, Subscriber};
use uuid::Uuid;

use super::types::{DisplayId, Profile, Workspace, WorkspaceRef};
use crate::config::{AppRef, Settings, SpacesConfig};

/// Maximum number of displays remembered in the focus history.
const DISPLAY_HISTORY_LEN: usize = 16;

/// Active workspace per display.
pub type ActiveMap = BTreeMap<DisplayId, Uuid>;

/// The root state container for the workspace engine.
pub struct EngineState {
    /// All configured profiles.
    profiles: Vec<Profile>,

    /// Index of the active profile in `profiles`.
    active_profile: usize,

    /// Switching behavior.
    pub settings: Settings,

    /// Apps exempt from hiding (settings plus runtime additions).
    pub floating: Vec<AppRef>,

    /// Workspace currently shown on each display.
    active: Observable<ActiveMap>,

    /// Workspace shown on each display before the current one.
    most_recent: HashMap<DisplayId, Uuid>,

    /// Last app the user focused while each workspace was active.
    last_focused: HashMap<Uuid, AppRef>,

    /// Displays that held focus, most recent last.
    display_history: Vec<DisplayId>,

    /// When the engine last activated a workspace.
    pub last_activation: Option<Instant>,
}

impl Default for EngineState {
    fn default() -> Self { Self::new(&SpacesConfig::default()) }
}

impl EngineState {
    /// Create the state for a loaded configuration.
    ///
    /// A configuration without profiles gets an empty "Default" profile.
    #[must_use]
    pub fn new(config: &SpacesConfig) -> Self {
        let mut profiles: Vec<Profile> = config.profiles.iter().map(Profile::from).collect();
        if profiles.is_empty() {
            profiles.push(Profile {
                name: "Default".to_string(),
                workspaces: Vec::new(),
            });
        }

        let active_profile = profiles
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(&config.active_profile))
            .unwrap_or(0);

        Self {
            profiles,
            active_profile,
            floating: config.settings.floating_apps.clone(),
            settings: config.settings.clone(),
            active: Observable::new(ActiveMap::new()),
            most_recent: HashMap::new(),
            last_focused: HashMap::new(),
            display_history: Vec::new(),
            last_activation: None,
        }
    }

    // ========================================================================
    // Profile Operations
    // ========================================================================

    #[must_use]
    pub fn profile(&self) -> &Profile { &self.profiles[self.active_profile] }

    #[must_use]
    pub fn profiles(&self) -> &[Profile] { &self.profiles }

    /// Make the named profile active. Returns `false` if it does not exist.
    ///
    /// Active and most-recent maps are cleared since they refer to the
    /// previous profile's workspaces.
    pub fn switch_profile(&mut self, name: &str) -> bool {
        let Some(index) = self.profiles.iter().position(|p| p.name.eq_ignore_ascii_case(name))
        else {
            return false;
        };

        self.active_profile = index;
        self.clear_active();
        self.most_recent.clear();
        true
    }

    /// Replace profiles and settings with a reloaded configuration.
    ///
    /// Active entries survive when the new profile has a workspace with the
    /// same id or name; everything else is dropped.
    pub fn replace_config(&mut self, config: &SpacesConfig) {
        let previous = self.profile().clone();
        let Self {
            profiles,
            active_profile,
            settings,
            floating,
            ..
        } = Self::new(config);
        self.profiles = profiles;
        self.active_profile = active_profile;
        self.settings = settings;
        self.floating = floating;

        let profile = self.profile().clone();
        let remap = |id: Uuid| -> Option<Uuid> {
            let old = previous.workspaces.iter().find(|w| w.id == id)?;
            profile
                .workspaces
                .iter()
                .find(|w| w.id == old.id || w.name.eq_ignore_ascii_case(&old.name))
                .map(|w| w.id)
        };

        let active: ActiveMap = self
            .active_workspaces()
            .into_iter()
            .filter_map(|(display, id)| remap(id).map(|id| (display, id)))
            .collect();
        Observable::set(&mut self.active, active);

        self.most_recent = std::mem::take(&mut self.most_recent)
            .into_iter()
            .filter_map(|(display, id)| remap(id).map(|id| (display, id)))
            .collect();

        self.last_focused = std::mem::take(&mut self.last_focused)
            .into_iter()
            .filter_map(|(id, app)| remap(id).map(|id| (id, app)))
            .collect();
    }

    // ========================================================================
    // Workspace Operations
    // ========================================================================

    /// Workspaces of the active profile, in configured order.
    #[must_use]
    pub fn workspaces(&self) -> &[Workspace] { &self.profile().workspaces }

    #[must_use]
    pub fn workspace(&self, id: Uuid) -> Option<&Workspace> {
        self.workspaces().iter().find(|w| w.id == id)
    }

    pub fn workspace_mut(&mut self, id: Uuid) -> Option<&mut Workspace> {
        self.profiles[self.active_profile].workspaces.iter_mut().find(|w| w.id == id)
    }

    /// Iterate mutably over the active profile's workspaces.
    pub fn workspaces_mut(&mut self) -> impl Iterator<Item = &mut Workspace> {
        self.profiles[self.active_profile].workspaces.iter_mut()
    }

    /// Resolve a command's workspace reference.
    #[must_use]
    pub fn find_workspace(&self, reference: &WorkspaceRef) -> Option<&Workspace> {
        match reference {
            WorkspaceRef::Name(name) => {
                self.workspaces().iter().find(|w| w.name.eq_ignore_ascii_case(name))
            }
            WorkspaceRef::Number(n) => n.checked_sub(1).and_then(|i| self.workspaces().get(i)),
            WorkspaceRef::Id(id) => self.workspace(*id),
        }
    }

    /// True if any workspace of the active profile lists `app`.
    #[must_use]
    pub fn is_assigned(&self, app: &AppRef) -> bool {
        self.workspaces().iter().any(|w| w.contains_app(app))
    }

    #[must_use]
    pub fn is_floating(&self, app: &AppRef) -> bool { self.floating.iter().any(|a| a.refers_to(app)) }

    // ========================================================================
    // Active Workspace Operations
    // ========================================================================

    /// Snapshot of the active workspace per display.
    #[must_use]
    pub fn active_workspaces(&self) -> ActiveMap { Observable::get(&self.active).clone() }

    #[must_use]
    pub fn active_on(&self, display: &DisplayId) -> Option<Uuid> {
        Observable::get(&self.active).get(display).copied()
    }

    /// Displays currently showing the workspace.
    #[must_use]
    pub fn displays_of(&self, id: Uuid) -> Vec<DisplayId> {
        Observable::get(&self.active)
            .iter()
            .filter(|(_, active)| **active == id)
            .map(|(display, _)| display.clone())
            .collect()
    }

    #[must_use]
    pub fn is_active(&self, id: Uuid) -> bool {
        Observable::get(&self.active).values().any(|active| *active == id)
    }

    /// Record `id` as active on `display`.
    ///
    /// The previous entry moves to the most-recent map only when it differs.
    pub fn set_active(&mut self, display: &DisplayId, id: Uuid) {
        let mut active = self.active_workspaces();
        if let Some(previous) = active.insert(display.clone(), id)
            && previous != id
        {
            self.most_recent.insert(display.clone(), previous);
        }
        Observable::set(&mut self.active, active);
    }

    /// Drop `id` from every display except those in `keep`.
    pub fn retain_active_displays(&mut self, id: Uuid, keep: &[DisplayId]) {
        let mut active = self.active_workspaces();
        let before = active.len();
        active.retain(|display, active| *active != id || keep.contains(display));
        if active.len() != before {
            Observable::set(&mut self.active, active);
        }
    }

    /// Replace the active map without touching the most-recent map.
    pub fn replace_active(&mut self, active: ActiveMap) { Observable::set(&mut self.active, active); }

    pub fn clear_active(&mut self) { Observable::set(&mut self.active, ActiveMap::new()); }

    /// Subscribe to changes of the active workspace map.
    #[must_use]
    pub fn subscribe_active(&self) -> Subscriber<ActiveMap> { Observable::subscribe(&self.active) }

    #[must_use]
    pub fn most_recent_on(&self, display: &DisplayId) -> Option<Uuid> {
        self.most_recent.get(display).copied()
    }

    #[must_use]
    pub fn most_recent(&self) -> BTreeMap<DisplayId, Uuid> {
        self.most_recent.iter().map(|(d, id)| (d.clone(), *id)).collect()
    }

    /// Keep only the most-recent entries accepted by `f`.
    pub fn retain_most_recent(&mut self, mut f: impl FnMut(&DisplayId, Uuid) -> bool) {
        self.most_recent.retain(|display, id| f(display, *id));
    }

    // ========================================================================
    // Recency Operations
    // ========================================================================

    #[must_use]
    pub fn last_focused(&self, id: Uuid) -> Option<&AppRef> { self.last_focused.get(&id) }

    pub fn set_last_focused(&mut self, id: Uuid, app: AppRef) { self.last_focused.insert(id, app); }

    /// Forget `app` as the last focused app of every workspace.
    pub fn forget_last_focused(&mut self, app: &AppRef) {
        self.last_focused.retain(|_, focused| !focused.refers_to(app));
    }

    /// Move `display` to the end of the focus history.
    pub fn record_display_focus(&mut self, display: &DisplayId) {
        if self.display_history.last() == Some(display) {
            return;
        }
        self.display_history.retain(|d| d != display);
        self.display_history.push(display.clone());
        if self.display_history.len() > DISPLAY_HISTORY_LEN {
            self.display_history.remove(0);
        }
    }

    /// Displays that held focus, most recent last.
    #[must_use]
    pub fn display_history(&self) -> &[DisplayId] { &self.display_history }
}

//! Picture-in-Picture guard.
//!
//! Hiding an app also hides its PiP overlay. When an app that must be hidden
//! shows a PiP window, its other windows are parked in a screen corner
//! instead, and moved back on restore.
//!
//! Records are keyed by process and window id only, so a window that
//! disappears while parked leaves nothing behind but a stale map entry that
//! the next restore or termination clears.

mod rules;

use std::collections::HashMap;

pub use rules::{KnownPipApp, PipRule, PipRules};

use super::platform::WindowSystem;
use super::state::{Display, Pid, Point, Rect, RunningApp, WindowId, WindowIdList, WindowInfo};
use crate::config::PictureInPictureConfig;

/// Tolerance when deciding whether two displays share an edge.
const EDGE_EPSILON: f64 = 1.0;

/// Tracks apps whose windows were relocated instead of hidden.
#[derive(Debug, Default)]
pub struct PipGuard {
    enabled: bool,
    offset: f64,
    rules: PipRules,

    /// Relocated windows per app.
    hidden: HashMap<Pid, WindowIdList>,

    /// Origin of each relocated window before it was moved.
    origins: HashMap<WindowId, Point>,
}

impl PipGuard {
    #[must_use]
    pub fn new(config: &PictureInPictureConfig) -> Self {
        Self {
            enabled: config.enabled,
            offset: f64::from(config.screen_corner_offset),
            rules: PipRules::new(config),
            hidden: HashMap::new(),
            origins: HashMap::new(),
        }
    }

    /// Apply new settings. Existing relocation records are kept.
    pub fn update_config(&mut self, config: &PictureInPictureConfig) {
        self.enabled = config.enabled;
        self.offset = f64::from(config.screen_corner_offset);
        self.rules = PipRules::new(config);
    }

    /// Whether hiding `app` must be replaced by relocating its windows.
    ///
    /// `windows` are the app's current windows. In static display mode apps
    /// spanning more than one display are never relocated.
    #[must_use]
    pub fn should_relocate(
        &self,
        app: &RunningApp,
        windows: &[WindowInfo],
        displays: &[Display],
        static_mode: bool,
    ) -> bool {
        if !self.enabled {
            return false;
        }

        let Some(rule) = self.rules.rule_for(&app.bundle_id) else {
            return false;
        };

        if !windows.iter().any(|w| !w.is_minimized && rule.is_pip_window(w)) {
            return false;
        }

        if static_mode && displays.len() > 1 {
            let mut occupied: Vec<&str> = windows
                .iter()
                .filter(|w| !w.is_minimized)
                .filter_map(|w| super::state::display_for_frame(&w.frame, displays))
                .map(|d| d.id.as_str())
                .collect();
            occupied.sort_unstable();
            occupied.dedup();
            if occupied.len() > 1 {
                tracing::debug!(app = %app.name, "spaces: not relocating app spanning displays");
                return false;
            }
        }

        true
    }

    /// Park every non-PiP window of `app` in a corner of its display.
    ///
    /// Windows already parked keep their first captured origin.
    pub fn relocate(
        &mut self,
        ws: &dyn WindowSystem,
        app: &RunningApp,
        windows: &[WindowInfo],
        displays: &[Display],
    ) {
        let Some(rule) = self.rules.rule_for(&app.bundle_id) else {
            return;
        };

        let targets: Vec<&WindowInfo> =
            windows.iter().filter(|w| !w.is_minimized && !rule.is_pip_window(w)).collect();

        let Some(anchor) = targets
            .iter()
            .find_map(|w| super::state::display_for_frame(&w.frame, displays))
            .or_else(|| super::display::main_display(displays))
        else {
            return;
        };

        let newly_tracked = !self.hidden.contains_key(&app.pid);

        if let Err(err) = ws.set_animations_enabled(app.pid, false) {
            tracing::trace!(app = %app.name, error = %err, "spaces: could not disable animations");
        }

        for window in targets {
            let origin = corner_origin(&anchor.frame, &window.frame, displays, self.offset);
            self.origins.entry(window.id).or_insert_with(|| window.frame.origin());

            if let Err(err) = ws.set_window_position(window.id, origin) {
                tracing::warn!(
                    app = %app.name,
                    window = window.id,
                    error = %err,
                    "spaces: failed to relocate window"
                );
            }

            let list = self.hidden.entry(app.pid).or_default();
            if !list.contains(&window.id) {
                list.push(window.id);
            }
        }

        if let Err(err) = ws.set_animations_enabled(app.pid, true) {
            tracing::trace!(app = %app.name, error = %err, "spaces: could not enable animations");
        }

        if newly_tracked && self.hidden.contains_key(&app.pid) {
            if let Err(err) = ws.observe_focus(app.pid) {
                tracing::warn!(app = %app.name, error = %err, "spaces: failed to observe PiP focus");
            }
            tracing::debug!(app = %app.name, "spaces: relocated windows instead of hiding");
        }
    }

    /// Move the app's relocated windows back and drop its records.
    ///
    /// Returns `false` if nothing was relocated for the app.
    pub fn restore(&mut self, ws: &dyn WindowSystem, pid: Pid) -> bool {
        let Some(windows) = self.hidden.remove(&pid) else {
            return false;
        };

        if let Err(err) = ws.set_animations_enabled(pid, false) {
            tracing::trace!(pid, error = %err, "spaces: could not disable animations");
        }

        for window in windows {
            let Some(origin) = self.origins.remove(&window) else {
                continue;
            };
            if let Err(err) = ws.set_window_position(window, origin) {
                tracing::warn!(pid, window, error = %err, "spaces: failed to restore window");
            }
        }

        if let Err(err) = ws.set_animations_enabled(pid, true) {
            tracing::trace!(pid, error = %err, "spaces: could not enable animations");
        }

        ws.remove_focus_observer(pid);
        tracing::debug!(pid, "spaces: restored relocated windows");
        true
    }

    /// Restore every relocated app.
    pub fn restore_all(&mut self, ws: &dyn WindowSystem) {
        let pids: Vec<Pid> = self.hidden.keys().copied().collect();
        for pid in pids {
            self.restore(ws, pid);
        }
    }

    /// Drop the records of a terminated app without moving anything.
    pub fn forget(&mut self, ws: &dyn WindowSystem, pid: Pid) {
        if let Some(windows) = self.hidden.remove(&pid) {
            for window in windows {
                self.origins.remove(&window);
            }
            ws.remove_focus_observer(pid);
        }
    }

    #[must_use]
    pub fn is_relocated(&self, pid: Pid) -> bool { self.hidden.contains_key(&pid) }

    /// Apps with relocated windows.
    #[must_use]
    pub fn relocated_apps(&self) -> Vec<Pid> {
        let mut pids: Vec<Pid> = self.hidden.keys().copied().collect();
        pids.sort_unstable();
        pids
    }

    #[must_use]
    pub fn captured_origin(&self, window: WindowId) -> Option<Point> {
        self.origins.get(&window).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.hidden.is_empty() && self.origins.is_empty() }
}

/// Target origin for a parked window.
///
/// Bottom-right corner by default. When another display touches the right
/// edge (and the left edge is free), the bottom-left corner is used so the
/// window does not spill onto the neighbour.
fn corner_origin(display: &Rect, window: &Rect, displays: &[Display], offset: f64) -> Point {
    let touches = |edge_x: f64, neighbour_edge: fn(&Rect) -> f64| {
        displays.iter().any(|d| {
            d.frame != *display
                && (neighbour_edge(&d.frame) - edge_x).abs() < EDGE_EPSILON
                && d.frame.vertical_overlap(display)
        })
    };

    let right_taken = touches(display.max_x(), Rect::min_x);
    let left_taken = touches(display.min_x(), Rect::max_x);
    let y = display.max_y() - offset;

    if right_taken && !left_taken {
        Point::new(display.min_x() + offset - window.width, y)
    } else {
        Point::new(display.max_x() - offset, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipAppConfig;
    use crate::modules::workspaces::state::ActivationPolicy;
    use crate::modules::workspaces::testing::FakeWindowSystem;

    fn chrome() -> RunningApp {
        RunningApp {
            pid: 10,
            name: "Google Chrome".to_string(),
            bundle_id: "com.google.Chrome".to_string(),
            activation_policy: ActivationPolicy::Regular,
            is_hidden: false,
        }
    }

    fn window(id: WindowId, title: &str, frame: Rect) -> WindowInfo {
        WindowInfo {
            id,
            pid: 10,
            title: title.to_string(),
            subrole: "AXStandardWindow".to_string(),
            frame,
            is_minimized: false,
        }
    }

    fn single_display() -> Vec<Display> {
        vec![Display::new("Main", Rect::new(0.0, 0.0, 1440.0, 900.0), true)]
    }

    fn chrome_windows() -> Vec<WindowInfo> {
        vec![
            window(1, "GitHub", Rect::new(100.0, 50.0, 1000.0, 700.0)),
            window(2, "Picture in Picture", Rect::new(1100.0, 650.0, 320.0, 180.0)),
            window(3, "Docs", Rect::new(200.0, 80.0, 900.0, 600.0)),
        ]
    }

    mod should_relocate_tests {
        use super::*;

        #[test]
        fn test_requires_pip_window() {
            let guard = PipGuard::new(&PictureInPictureConfig::default());
            let mut windows = chrome_windows();
            assert!(guard.should_relocate(&chrome(), &windows, &single_display(), true));

            windows.remove(1);
            assert!(!guard.should_relocate(&chrome(), &windows, &single_display(), true));
        }

        #[test]
        fn test_disabled() {
            let config = PictureInPictureConfig {
                enabled: false,
                ..Default::default()
            };
            let guard = PipGuard::new(&config);
            assert!(!guard.should_relocate(&chrome(), &chrome_windows(), &single_display(), true));
        }

        #[test]
        fn test_unknown_app() {
            let guard = PipGuard::new(&PictureInPictureConfig::default());
            let mut app = chrome();
            app.bundle_id = "com.apple.Safari".to_string();
            assert!(!guard.should_relocate(&app, &chrome_windows(), &single_display(), true));
        }

        #[test]
        fn test_minimized_pip_window_does_not_count() {
            let guard = PipGuard::new(&PictureInPictureConfig::default());
            let mut windows = chrome_windows();
            windows[1].is_minimized = true;
            assert!(!guard.should_relocate(&chrome(), &windows, &single_display(), true));
        }

        #[test]
        fn test_multi_display_app_in_static_mode() {
            let guard = PipGuard::new(&PictureInPictureConfig::default());
            let displays = vec![
                Display::new("Main", Rect::new(0.0, 0.0, 1440.0, 900.0), true),
                Display::new("Side", Rect::new(1440.0, 0.0, 1920.0, 1080.0), false),
            ];
            let mut windows = chrome_windows();
            windows[2].frame = Rect::new(1600.0, 100.0, 800.0, 600.0);

            assert!(!guard.should_relocate(&chrome(), &windows, &displays, true));
            assert!(guard.should_relocate(&chrome(), &windows, &displays, false));
        }

        #[test]
        fn test_custom_app_regex() {
            let config = PictureInPictureConfig {
                apps: vec![PipAppConfig {
                    name: "IINA".to_string(),
                    bundle_identifier: "com.colliderli.iina".to_string(),
                    pip_window_title_regex: "^PiP".to_string(),
                }],
                ..Default::default()
            };
            let guard = PipGuard::new(&config);
            let mut app = chrome();
            app.bundle_id = "com.colliderli.iina".to_string();
            let windows = vec![
                window(1, "movie.mkv", Rect::new(0.0, 0.0, 800.0, 600.0)),
                window(2, "PiP movie.mkv", Rect::new(0.0, 0.0, 320.0, 180.0)),
            ];
            assert!(guard.should_relocate(&app, &windows, &single_display(), true));
        }
    }

    mod relocation_tests {
        use super::*;

        #[test]
        fn test_relocate_moves_non_pip_windows_to_bottom_right() {
            let ws = FakeWindowSystem::new();
            let mut guard = PipGuard::new(&PictureInPictureConfig::default());

            guard.relocate(&ws, &chrome(), &chrome_windows(), &single_display());

            let expected = Point::new(1440.0 - 15.0, 900.0 - 15.0);
            assert_eq!(ws.position_of(1), Some(expected));
            assert_eq!(ws.position_of(3), Some(expected));
            assert_eq!(ws.position_of(2), None);
            assert!(guard.is_relocated(10));
            assert!(ws.is_observing_focus(10));
        }

        #[test]
        fn test_relocate_uses_bottom_left_when_right_edge_is_shared() {
            let ws = FakeWindowSystem::new();
            let mut guard = PipGuard::new(&PictureInPictureConfig::default());
            let displays = vec![
                Display::new("Main", Rect::new(0.0, 0.0, 1440.0, 900.0), true),
                Display::new("Side", Rect::new(1440.0, 0.0, 1920.0, 1080.0), false),
            ];

            guard.relocate(&ws, &chrome(), &chrome_windows(), &displays);

            assert_eq!(ws.position_of(1), Some(Point::new(15.0 - 1000.0, 885.0)));
            assert_eq!(ws.position_of(3), Some(Point::new(15.0 - 900.0, 885.0)));
        }

        #[test]
        fn test_relocate_then_restore_round_trip() {
            let ws = FakeWindowSystem::new();
            let mut guard = PipGuard::new(&PictureInPictureConfig::default());
            let windows = chrome_windows();

            guard.relocate(&ws, &chrome(), &windows, &single_display());
            assert!(guard.restore(&ws, 10));

            assert_eq!(ws.position_of(1), Some(windows[0].frame.origin()));
            assert_eq!(ws.position_of(3), Some(windows[2].frame.origin()));
            assert!(guard.is_empty());
            assert!(!ws.is_observing_focus(10));
        }

        #[test]
        fn test_second_relocation_keeps_first_origin() {
            let ws = FakeWindowSystem::new();
            let mut guard = PipGuard::new(&PictureInPictureConfig::default());
            let mut windows = chrome_windows();

            guard.relocate(&ws, &chrome(), &windows, &single_display());
            windows[0].frame = Rect::new(1425.0, 885.0, 1000.0, 700.0);
            guard.relocate(&ws, &chrome(), &windows, &single_display());

            assert_eq!(guard.captured_origin(1), Some(Point::new(100.0, 50.0)));
        }

        #[test]
        fn test_restore_unknown_app_is_noop() {
            let ws = FakeWindowSystem::new();
            let mut guard = PipGuard::new(&PictureInPictureConfig::default());
            assert!(!guard.restore(&ws, 99));
            assert!(ws.moves().is_empty());
        }

        #[test]
        fn test_forget_drops_records_without_moving() {
            let ws = FakeWindowSystem::new();
            let mut guard = PipGuard::new(&PictureInPictureConfig::default());
            guard.relocate(&ws, &chrome(), &chrome_windows(), &single_display());
            let moves = ws.moves().len();

            guard.forget(&ws, 10);

            assert!(guard.is_empty());
            assert_eq!(ws.moves().len(), moves);
        }

        #[test]
        fn test_restore_all() {
            let ws = FakeWindowSystem::new();
            let mut guard = PipGuard::new(&PictureInPictureConfig::default());
            guard.relocate(&ws, &chrome(), &chrome_windows(), &single_display());

            guard.restore_all(&ws);

            assert!(guard.relocated_apps().is_empty());
            assert_eq!(ws.position_of(1), Some(Point::new(100.0, 50.0)));
        }
    }
}

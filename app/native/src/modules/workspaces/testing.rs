//! In-memory window system for engine tests.
//!
//! Keeps apps, windows (front to back) and displays in a mutex and records
//! every mutating call so tests can assert on the exact side effects.

use std::collections::HashSet;

use parking_lot::Mutex;

use super::platform::{PlatformError, PlatformResult, WindowSystem};
use super::state::{
    ActivationPolicy, Display, Pid, Point, Rect, RunningApp, WindowId, WindowInfo,
};

/// A recorded window system call.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Hide(Pid),
    Unhide(Pid),
    Activate(Pid),
    Raise(WindowId),
    Move(WindowId, Point),
    Minimize(WindowId, bool),
    Warp(Point),
}

#[derive(Default)]
struct Inner {
    untrusted: bool,
    apps: Vec<RunningApp>,
    /// Front to back.
    windows: Vec<WindowInfo>,
    displays: Vec<Display>,
    frontmost: Option<Pid>,
    focused_window: Option<WindowId>,
    cursor: Option<Point>,
    calls: Vec<Call>,
    observed: HashSet<Pid>,
    ignore_hide: HashSet<Pid>,
    window_stack: bool,
}

/// Fake [`WindowSystem`] backed by plain vectors.
#[derive(Default)]
pub struct FakeWindowSystem {
    inner: Mutex<Inner>,
}

impl FakeWindowSystem {
    pub fn new() -> Self { Self::default() }

    // ========================================================================
    // Setup
    // ========================================================================

    pub fn add_display(&self, name: &str, frame: Rect, is_main: bool) {
        self.inner.lock().displays.push(Display::new(name, frame, is_main));
    }

    pub fn remove_display(&self, name: &str) {
        self.inner.lock().displays.retain(|d| d.id.as_str() != name);
    }

    pub fn add_app(&self, pid: Pid, name: &str, bundle_id: &str) {
        self.add_app_with_policy(pid, name, bundle_id, ActivationPolicy::Regular);
    }

    pub fn add_app_with_policy(
        &self,
        pid: Pid,
        name: &str,
        bundle_id: &str,
        activation_policy: ActivationPolicy,
    ) {
        self.inner.lock().apps.push(RunningApp {
            pid,
            name: name.to_string(),
            bundle_id: bundle_id.to_string(),
            activation_policy,
            is_hidden: false,
        });
    }

    pub fn remove_app(&self, pid: Pid) {
        let mut inner = self.inner.lock();
        inner.apps.retain(|a| a.pid != pid);
        inner.windows.retain(|w| w.pid != pid);
    }

    /// Add a window behind all existing ones.
    pub fn add_window(&self, pid: Pid, id: WindowId, title: &str, frame: Rect) {
        self.inner.lock().windows.push(WindowInfo {
            id,
            pid,
            title: title.to_string(),
            subrole: "AXStandardWindow".to_string(),
            frame,
            is_minimized: false,
        });
    }

    pub fn set_subrole(&self, id: WindowId, subrole: &str) {
        if let Some(window) = self.inner.lock().windows.iter_mut().find(|w| w.id == id) {
            window.subrole = subrole.to_string();
        }
    }

    pub fn set_minimized(&self, id: WindowId, minimized: bool) {
        if let Some(window) = self.inner.lock().windows.iter_mut().find(|w| w.id == id) {
            window.is_minimized = minimized;
        }
    }

    /// Make `id` the key window and its app frontmost.
    pub fn focus_window(&self, id: WindowId) {
        let mut inner = self.inner.lock();
        let pid = inner.windows.iter().find(|w| w.id == id).map(|w| w.pid);
        inner.frontmost = pid;
        inner.focused_window = Some(id);
    }

    pub fn set_frontmost(&self, pid: Pid) {
        let mut inner = self.inner.lock();
        inner.frontmost = Some(pid);
        inner.focused_window = inner.windows.iter().find(|w| w.pid == pid).map(|w| w.id);
    }

    pub fn set_cursor(&self, point: Point) { self.inner.lock().cursor = Some(point); }

    pub fn set_trusted(&self, trusted: bool) { self.inner.lock().untrusted = !trusted; }

    /// Simulate an app whose hide request never completes.
    pub fn ignore_hide(&self, pid: Pid) { self.inner.lock().ignore_hide.insert(pid); }

    pub fn complete_hide(&self, pid: Pid) { self.inner.lock().ignore_hide.remove(&pid); }

    /// Enable the z-order query.
    pub fn enable_window_stack(&self) { self.inner.lock().window_stack = true; }

    // ========================================================================
    // Inspection
    // ========================================================================

    pub fn calls(&self) -> Vec<Call> { self.inner.lock().calls.clone() }

    pub fn clear_calls(&self) { self.inner.lock().calls.clear(); }

    pub fn is_hidden(&self, pid: Pid) -> bool {
        self.inner.lock().apps.iter().any(|a| a.pid == pid && a.is_hidden)
    }

    pub fn frontmost(&self) -> Option<Pid> { self.inner.lock().frontmost }

    pub fn hidden_calls(&self) -> Vec<Pid> {
        self.calls()
            .into_iter()
            .filter_map(|c| if let Call::Hide(pid) = c { Some(pid) } else { None })
            .collect()
    }

    pub fn activated(&self) -> Vec<Pid> {
        self.calls()
            .into_iter()
            .filter_map(|c| if let Call::Activate(pid) = c { Some(pid) } else { None })
            .collect()
    }

    pub fn raised(&self) -> Vec<WindowId> {
        self.calls()
            .into_iter()
            .filter_map(|c| if let Call::Raise(id) = c { Some(id) } else { None })
            .collect()
    }

    pub fn moves(&self) -> Vec<(WindowId, Point)> {
        self.calls()
            .into_iter()
            .filter_map(|c| if let Call::Move(id, p) = c { Some((id, p)) } else { None })
            .collect()
    }

    pub fn warps(&self) -> Vec<Point> {
        self.calls()
            .into_iter()
            .filter_map(|c| if let Call::Warp(p) = c { Some(p) } else { None })
            .collect()
    }

    /// Last position a window was moved to.
    pub fn position_of(&self, id: WindowId) -> Option<Point> {
        self.moves().into_iter().rev().find(|(w, _)| *w == id).map(|(_, p)| p)
    }

    pub fn frame_of(&self, id: WindowId) -> Option<Rect> {
        self.inner.lock().windows.iter().find(|w| w.id == id).map(|w| w.frame)
    }

    pub fn is_observing_focus(&self, pid: Pid) -> bool { self.inner.lock().observed.contains(&pid) }

    fn set_hidden(inner: &mut Inner, pid: Pid, hidden: bool) -> PlatformResult<()> {
        let app = inner
            .apps
            .iter_mut()
            .find(|a| a.pid == pid)
            .ok_or(PlatformError::AppNotRunning(pid))?;
        app.is_hidden = hidden;
        Ok(())
    }
}

impl WindowSystem for FakeWindowSystem {
    fn is_trusted(&self) -> bool { !self.inner.lock().untrusted }

    fn running_apps(&self) -> Vec<RunningApp> { self.inner.lock().apps.clone() }

    fn app_windows(&self, pid: Pid) -> Vec<WindowInfo> {
        self.inner.lock().windows.iter().filter(|w| w.pid == pid).cloned().collect()
    }

    fn displays(&self) -> Vec<Display> { self.inner.lock().displays.clone() }

    fn set_window_position(&self, window: WindowId, origin: Point) -> PlatformResult<()> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::Move(window, origin));
        let target = inner
            .windows
            .iter_mut()
            .find(|w| w.id == window)
            .ok_or(PlatformError::WindowNotFound(window))?;
        target.frame.x = origin.x;
        target.frame.y = origin.y;
        Ok(())
    }

    fn raise_window(&self, window: WindowId) -> PlatformResult<()> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::Raise(window));
        let index = inner
            .windows
            .iter()
            .position(|w| w.id == window)
            .ok_or(PlatformError::WindowNotFound(window))?;
        let raised = inner.windows.remove(index);
        inner.windows.insert(0, raised);
        Ok(())
    }

    fn activate_app(&self, pid: Pid) -> PlatformResult<()> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::Activate(pid));
        Self::set_hidden(&mut inner, pid, false)?;
        inner.frontmost = Some(pid);
        let front = inner.windows.iter().find(|w| w.pid == pid && !w.is_minimized).map(|w| w.id);
        inner.focused_window = front;
        Ok(())
    }

    fn hide_app(&self, pid: Pid) -> PlatformResult<()> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::Hide(pid));
        if inner.ignore_hide.contains(&pid) {
            return Ok(());
        }
        Self::set_hidden(&mut inner, pid, true)
    }

    fn unhide_app(&self, pid: Pid) -> PlatformResult<()> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::Unhide(pid));
        Self::set_hidden(&mut inner, pid, false)
    }

    fn minimize_window(&self, window: WindowId, minimized: bool) -> PlatformResult<()> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::Minimize(window, minimized));
        let target = inner
            .windows
            .iter_mut()
            .find(|w| w.id == window)
            .ok_or(PlatformError::WindowNotFound(window))?;
        target.is_minimized = minimized;
        Ok(())
    }

    fn frontmost_app(&self) -> Option<RunningApp> {
        let inner = self.inner.lock();
        let pid = inner.frontmost?;
        inner.apps.iter().find(|a| a.pid == pid).cloned()
    }

    fn focused_window(&self) -> Option<WindowInfo> {
        let inner = self.inner.lock();
        let id = inner.focused_window?;
        inner.windows.iter().find(|w| w.id == id).cloned()
    }

    fn cursor_location(&self) -> Option<Point> { self.inner.lock().cursor }

    fn warp_cursor(&self, point: Point) -> PlatformResult<()> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::Warp(point));
        inner.cursor = Some(point);
        Ok(())
    }

    fn window_stack(&self) -> PlatformResult<Vec<WindowInfo>> {
        let inner = self.inner.lock();
        if !inner.window_stack {
            return Err(PlatformError::Unsupported("window_stack"));
        }
        let hidden: HashSet<Pid> =
            inner.apps.iter().filter(|a| a.is_hidden).map(|a| a.pid).collect();
        Ok(inner
            .windows
            .iter()
            .filter(|w| !w.is_minimized && !hidden.contains(&w.pid))
            .cloned()
            .collect())
    }

    fn observe_focus(&self, pid: Pid) -> PlatformResult<()> {
        self.inner.lock().observed.insert(pid);
        Ok(())
    }

    fn remove_focus_observer(&self, pid: Pid) { self.inner.lock().observed.remove(&pid); }
}

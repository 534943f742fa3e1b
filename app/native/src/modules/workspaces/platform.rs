//! Window system interface consumed by the workspace engine.
//!
//! The engine never talks to the OS directly. A platform binding implements
//! [`WindowSystem`] and the engine issues best-effort calls through it: a
//! failing call is logged by the caller and the batch continues.

use thiserror::Error;

use super::state::{Display, Pid, Point, RunningApp, WindowId, WindowInfo};

/// Errors reported by a window system binding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// The window no longer exists.
    #[error("window {0} not found")]
    WindowNotFound(WindowId),

    /// The process is not running.
    #[error("app with pid {0} is not running")]
    AppNotRunning(Pid),

    /// An accessibility call failed.
    #[error("accessibility error: {0}")]
    AxError(String),

    /// The binding does not implement the operation.
    #[error("operation not supported: {0}")]
    Unsupported(&'static str),
}

/// Result type for window system calls.
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Primitives the workspace engine needs from the window server.
///
/// Coordinates use a top-left origin relative to the primary display, with Y
/// growing downward.
pub trait WindowSystem: Send + Sync {
    /// Whether the process may control other apps' windows.
    fn is_trusted(&self) -> bool;

    /// All running apps, regardless of activation policy.
    fn running_apps(&self) -> Vec<RunningApp>;

    /// Windows of one app, including minimized ones.
    fn app_windows(&self, pid: Pid) -> Vec<WindowInfo>;

    /// Connected displays.
    fn displays(&self) -> Vec<Display>;

    /// Move a window's origin.
    fn set_window_position(&self, window: WindowId, origin: Point) -> PlatformResult<()>;

    /// Bring a window to the front of its app without changing keyboard focus.
    fn raise_window(&self, window: WindowId) -> PlatformResult<()>;

    /// Give keyboard focus to an app.
    fn activate_app(&self, pid: Pid) -> PlatformResult<()>;

    fn hide_app(&self, pid: Pid) -> PlatformResult<()>;

    fn unhide_app(&self, pid: Pid) -> PlatformResult<()>;

    fn minimize_window(&self, window: WindowId, minimized: bool) -> PlatformResult<()>;

    fn frontmost_app(&self) -> Option<RunningApp>;

    /// The key window of the frontmost app.
    fn focused_window(&self) -> Option<WindowInfo>;

    fn cursor_location(&self) -> Option<Point>;

    fn warp_cursor(&self, point: Point) -> PlatformResult<()>;

    /// On-screen windows ordered front to back.
    ///
    /// Ordering guarantees depend on the platform; callers treat the result
    /// as a hint.
    fn window_stack(&self) -> PlatformResult<Vec<WindowInfo>> {
        Err(PlatformError::Unsupported("window_stack"))
    }

    /// Toggle an app's window animations (used while relocating windows).
    fn set_animations_enabled(&self, _pid: Pid, _enabled: bool) -> PlatformResult<()> { Ok(()) }

    /// Start reporting focus changes of the app's windows as
    /// `StateMessage::PipFocusLost` when a Picture-in-Picture window loses focus.
    fn observe_focus(&self, _pid: Pid) -> PlatformResult<()> { Ok(()) }

    fn remove_focus_observer(&self, _pid: Pid) {}
}

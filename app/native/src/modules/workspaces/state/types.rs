//! Core state types for the workspace manager.
//!
//! These types form a relational structure:
//! - `Display` represents a connected physical display (keyed by name)
//! - `Workspace` groups apps and is assigned to a display (ID is UUID v7)
//! - `RunningApp` and `WindowInfo` are snapshots taken from the window system
//!
//! Window and process handles are plain correlation keys. They are never
//! dereferenced, so a window that disappears leaves no dangling reference.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use uuid::Uuid;

use crate::config::{AppRef, ProfileConfig, WorkspaceConfig};

// ============================================================================
// Geometry Types
// ============================================================================

/// A point in global window coordinates (top-left origin, Y grows downward).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 { (self.x - other.x).hypot(self.y - other.y) }
}

/// A rectangle with position and size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub const fn origin(&self) -> Point { Point::new(self.x, self.y) }

    #[must_use]
    pub const fn min_x(&self) -> f64 { self.x }

    #[must_use]
    pub fn max_x(&self) -> f64 { self.x + self.width }

    #[must_use]
    pub const fn min_y(&self) -> f64 { self.y }

    #[must_use]
    pub fn max_y(&self) -> f64 { self.y + self.height }

    /// Get the center point of this rectangle.
    #[must_use]
    pub fn center(&self) -> Point { Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0) }

    /// Check if this rectangle contains a point.
    #[must_use]
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.max_x() && point.y >= self.y && point.y < self.max_y()
    }

    /// Check if `other` lies entirely inside this rectangle.
    #[must_use]
    pub fn contains_rect(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }

    /// Check if this rectangle intersects with another.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.x < other.max_x()
            && self.max_x() > other.x
            && self.y < other.max_y()
            && self.max_y() > other.y
    }

    /// Area of the overlap with another rectangle (zero when disjoint).
    #[must_use]
    pub fn intersection_area(&self, other: &Self) -> f64 {
        let width = self.max_x().min(other.max_x()) - self.x.max(other.x);
        let height = self.max_y().min(other.max_y()) - self.y.max(other.y);
        if width <= 0.0 || height <= 0.0 { 0.0 } else { width * height }
    }

    /// True when the Y ranges of both rectangles overlap.
    #[must_use]
    pub fn vertical_overlap(&self, other: &Self) -> bool {
        self.y < other.max_y() && other.y < self.max_y()
    }

    /// True when the X ranges of both rectangles overlap.
    #[must_use]
    pub fn horizontal_overlap(&self, other: &Self) -> bool {
        self.x < other.max_x() && other.x < self.max_x()
    }
}

// ============================================================================
// Display Types
// ============================================================================

/// Display identifier: the display's user-visible name.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayId(pub String);

impl DisplayId {
    #[must_use]
    pub fn as_str(&self) -> &str { &self.0 }
}

impl From<&str> for DisplayId {
    fn from(name: &str) -> Self { Self(name.to_string()) }
}

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// A connected physical display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Display {
    pub id: DisplayId,

    /// Full frame in global coordinates.
    pub frame: Rect,

    /// Usable frame (excluding dock, menu bar).
    pub visible_frame: Rect,

    /// Is this the primary display?
    pub is_main: bool,
}

impl Display {
    /// Create a display whose visible frame equals its frame.
    #[must_use]
    pub fn new(name: &str, frame: Rect, is_main: bool) -> Self {
        Self {
            id: DisplayId::from(name),
            frame,
            visible_frame: frame,
            is_main,
        }
    }
}

/// Returns the display a frame belongs to.
///
/// The display containing the frame's center wins; otherwise the display with
/// the largest overlap.
#[must_use]
pub fn display_for_frame<'a>(frame: &Rect, displays: &'a [Display]) -> Option<&'a Display> {
    let center = frame.center();
    displays.iter().find(|d| d.frame.contains_point(center)).or_else(|| {
        displays
            .iter()
            .map(|d| (d, d.frame.intersection_area(frame)))
            .filter(|(_, area)| *area > 0.0)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(d, _)| d)
    })
}

/// Returns the display containing a point.
#[must_use]
pub fn display_at_point(point: Point, displays: &[Display]) -> Option<&Display> {
    displays.iter().find(|d| d.frame.contains_point(point))
}

// ============================================================================
// App & Window Types
// ============================================================================

/// Process identifier of a running app.
pub type Pid = i32;

/// Window server identifier of a window.
pub type WindowId = u32;

/// Window ID list type alias. Uses `SmallVec` for inline storage of up to 8 window IDs.
pub type WindowIdList = SmallVec<[WindowId; 8]>;

/// How an app presents itself to the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivationPolicy {
    /// Ordinary app with a Dock icon and menu bar.
    #[default]
    Regular,
    /// Menu bar extra or helper that may show windows.
    Accessory,
    /// Background-only process.
    Prohibited,
}

/// Snapshot of a running application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningApp {
    pub pid: Pid,
    pub name: String,
    pub bundle_id: String,
    pub activation_policy: ActivationPolicy,
    pub is_hidden: bool,
}

impl RunningApp {
    /// True for apps with a normal (non-background) activation policy.
    #[must_use]
    pub fn is_regular(&self) -> bool { self.activation_policy == ActivationPolicy::Regular }

    /// True if this process is the app described by `app`.
    #[must_use]
    pub fn is(&self, app: &AppRef) -> bool { app.matches(&self.name, &self.bundle_id) }

    /// True if any of `apps` describes this process.
    #[must_use]
    pub fn is_any(&self, apps: &[AppRef]) -> bool { apps.iter().any(|a| self.is(a)) }

    #[must_use]
    pub fn to_app_ref(&self) -> AppRef { AppRef::new(&self.name, &self.bundle_id) }
}

/// Snapshot of a single window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowInfo {
    pub id: WindowId,
    pub pid: Pid,
    pub title: String,

    /// Accessibility subrole (e.g. `AXStandardWindow`, `AXSystemDialog`).
    pub subrole: String,

    pub frame: Rect,
    pub is_minimized: bool,
}

// ============================================================================
// Workspace Type
// ============================================================================

/// Display assignment marker for the primary display.
pub const MAIN_DISPLAY: &str = "main";

/// A named group of apps bound to a display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    /// Unique identifier (UUID v7 when the config has none).
    pub id: Uuid,

    pub name: String,

    /// Configured display name, or [`MAIN_DISPLAY`].
    pub display: String,

    pub activate_shortcut: Option<String>,
    pub assign_app_shortcut: Option<String>,

    /// Apps in insertion order (later entries are preferred for focus).
    pub apps: Vec<AppRef>,

    pub app_to_focus: Option<AppRef>,
    pub icon: Option<String>,
}

impl Workspace {
    /// Create an empty workspace on `display`.
    #[must_use]
    pub fn new(name: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            display: display.into(),
            activate_shortcut: None,
            assign_app_shortcut: None,
            apps: Vec::new(),
            app_to_focus: None,
            icon: None,
        }
    }

    #[must_use]
    pub fn contains_app(&self, app: &AppRef) -> bool { self.apps.iter().any(|a| a.refers_to(app)) }
}

impl From<&WorkspaceConfig> for Workspace {
    fn from(config: &WorkspaceConfig) -> Self {
        Self {
            id: config.id.unwrap_or_else(Uuid::now_v7),
            name: config.name.clone(),
            display: config.display.clone(),
            activate_shortcut: config.activate_shortcut.clone(),
            assign_app_shortcut: config.assign_app_shortcut.clone(),
            apps: config.apps.clone(),
            app_to_focus: config.app_to_focus.clone(),
            icon: config.icon.clone(),
        }
    }
}

/// A named list of workspaces.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub workspaces: Vec<Workspace>,
}

impl From<&ProfileConfig> for Profile {
    fn from(config: &ProfileConfig) -> Self {
        Self {
            name: config.name.clone(),
            workspaces: config.workspaces.iter().map(Workspace::from).collect(),
        }
    }
}

// ============================================================================
// Command Arguments
// ============================================================================

/// Direction for geometric focus movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Direction for cycling through ordered lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleDirection {
    Next,
    Previous,
}

/// How a command refers to a workspace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkspaceRef {
    /// Case-insensitive workspace name.
    Name(String),
    /// 1-based position in the active profile.
    Number(usize),
    Id(Uuid),
}

impl fmt::Display for WorkspaceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Number(n) => write!(f, "#{n}"),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

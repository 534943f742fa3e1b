//! State module for the workspace manager.
//!
//! This module contains:
//! - Core types (`Rect`, `Display`, `RunningApp`, `WindowInfo`, `Workspace`, etc.)
//! - The `EngineState` struct owned by the workspace actor

mod engine_state;
mod types;

pub use engine_state::{ActiveMap, EngineState};
pub use types::{
    ActivationPolicy, CycleDirection, Direction, Display, DisplayId, MAIN_DISPLAY, Pid, Point,
    Profile, Rect, RunningApp, WindowId, WindowIdList, WindowInfo, Workspace, WorkspaceRef,
    display_at_point, display_for_frame,
};

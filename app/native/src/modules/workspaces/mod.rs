//! Virtual workspace manager.
//!
//! Groups apps into named workspaces bound to displays and decides, on every
//! activation or focus change, which apps are shown, hidden, raised or moved
//! aside for a Picture-in-Picture window.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │        Platform binding (WindowSystem implementation)       │
//! │   app activation, termination, display change notifications │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │ mpsc::Sender<StateMessage>
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     State Actor                              │
//! │  - Owns the Engine (state, PiP guard, timers)               │
//! │  - Processes messages sequentially                          │
//! │  - Turns engine timers into tokio sleeps                    │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │ broadcast::Sender<EngineEvent>
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │            Collaborators (menu bar, shell hooks)            │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod actor;
pub mod clock;
pub mod display;
pub mod engine;
pub mod init;
pub mod pip;
pub mod platform;
pub mod state;
#[cfg(test)]
pub mod testing;

pub use actor::{ActorError, Command, StateActor, StateActorHandle, StateMessage, StateQuery};
pub use clock::{Clock, SystemClock};
pub use engine::{ActivationPlan, Engine, Snapshot, Timer};
pub use init::{get_handle, init, init_with, is_initialized, shutdown};
pub use pip::{KnownPipApp, PipGuard};
pub use platform::{PlatformError, PlatformResult, WindowSystem};
pub use state::{
    ActiveMap, CycleDirection, Direction, Display, DisplayId, EngineState, Rect, RunningApp,
    WindowInfo, Workspace, WorkspaceRef,
};

//! Application feature modules.
//!
//! - [`workspaces`] - Virtual workspaces, focus movement and PiP handling

pub mod workspaces;

//! Error types for Spaces.
//!
//! This module provides the unified error type returned by every public
//! workspace command. Lookup failures are reported before any window-system
//! call is issued, so a returned error means no visible change happened.

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::modules::workspaces::actor::ActorError;

/// Errors that can occur during application execution.
///
/// Serialized as `{ "kind": ..., "message": ... }` so surfaces like the CLI
/// or a toast notification can show a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum SpacesError {
    /// No workspace matches the given name, number or id.
    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(String),
    /// The app is not running or not known to the window system.
    #[error("App not found: {0}")]
    AppNotFound(String),
    /// No connected display matches the given name.
    #[error("Display not found: {0}")]
    DisplayNotFound(String),
    /// The operation needs an active workspace and none is active.
    #[error("No active workspace")]
    NoActiveWorkspace,
    /// The operation needs a focused app or window and none is focused.
    #[error("No focused app")]
    NoFocusedApp,
    /// Accessibility permission has not been granted.
    #[error("Accessibility access is required to manage windows")]
    AccessibilityDenied,
    /// Invalid command arguments.
    #[error("{0}")]
    InvalidArguments(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
    /// The workspace actor could not be reached.
    #[error("Actor error: {0}")]
    ActorError(String),
}

/// Result type for workspace commands.
pub type SpacesResult<T> = Result<T, SpacesError>;

impl From<std::io::Error> for SpacesError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<ConfigError> for SpacesError {
    fn from(err: ConfigError) -> Self { Self::ConfigError(err.to_string()) }
}

impl From<ActorError> for SpacesError {
    fn from(err: ActorError) -> Self { Self::ActorError(err.to_string()) }
}

impl From<&str> for SpacesError {
    fn from(msg: &str) -> Self { Self::InvalidArguments(msg.to_string()) }
}

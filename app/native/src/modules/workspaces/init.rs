//! Process-wide entry point for the workspace manager.
//!
//! A platform binding calls [`init`] once with its [`WindowSystem`] from
//! inside a tokio runtime, then forwards window system notifications through
//! the handle returned by [`get_handle`].

use std::sync::{Arc, OnceLock};

use super::actor::{StateActor, StateActorHandle};
use super::clock::SystemClock;
use super::engine::Engine;
use super::platform::WindowSystem;
use crate::config::{SpacesConfig, get_config, get_config_path, watch_config_file};

/// Global state actor handle.
static HANDLE: OnceLock<StateActorHandle> = OnceLock::new();

/// Gets the global state actor handle.
///
/// Returns `None` if the workspace manager hasn't been initialized yet.
#[must_use]
pub fn get_handle() -> Option<&'static StateActorHandle> {
    let handle = HANDLE.get();
    if handle.is_none() {
        tracing::trace!("spaces: get_handle called before initialization");
    }
    handle
}

/// Returns whether the workspace manager has been initialized.
#[must_use]
pub fn is_initialized() -> bool { HANDLE.get().is_some() }

/// Start the workspace manager with the loaded configuration and watch the
/// configuration file for changes.
///
/// Returns `false` if it was already initialized.
pub fn init(ws: Arc<dyn WindowSystem>) -> bool {
    let Some(handle) = init_with(get_config(), ws) else {
        return false;
    };

    if get_config_path().is_some() {
        let handle = handle.clone();
        watch_config_file(move |config| {
            if let Err(err) = handle.config_reloaded(config) {
                tracing::warn!(error = %err, "spaces: failed to forward reloaded config");
            }
        });
    }
    true
}

/// Start the workspace manager with an explicit configuration.
///
/// Returns `None` if it was already initialized.
pub fn init_with(config: &SpacesConfig, ws: Arc<dyn WindowSystem>) -> Option<StateActorHandle> {
    if HANDLE.get().is_some() {
        tracing::warn!("spaces: already initialized");
        return None;
    }

    if !ws.is_trusted() {
        tracing::warn!("spaces: accessibility permissions not granted, commands will fail");
    }

    let engine = Engine::new(config, ws, Arc::new(SystemClock));
    let handle = StateActor::spawn(engine);
    if HANDLE.set(handle.clone()).is_err() {
        tracing::warn!("spaces: already initialized");
        let _ = handle.shutdown();
        return None;
    }

    tracing::info!(
        workspaces = config.active_profile().map_or(0, |p| p.workspaces.len()),
        "spaces: initialized"
    );
    Some(handle)
}

/// Restore relocated windows and stop the actor.
pub fn shutdown() {
    if let Some(handle) = HANDLE.get() {
        let _ = handle.shutdown();
        tracing::info!("spaces: shutdown requested");
    }
}

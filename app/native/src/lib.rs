//! Spaces - virtual workspaces for macOS.
//!
//! Groups applications into named workspaces bound to displays and switches
//! which apps are visible and focused when a workspace is activated. The
//! engine is platform independent: a binding supplies a
//! [`modules::workspaces::WindowSystem`] and forwards its notifications to the
//! state actor.

pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod modules;
pub mod schema;

/// Initialize the tracing subscriber.
///
/// Logs from this crate at info level unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("spaces=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

//! Configuration file watcher for hot-reloading.
//!
//! Watches the loaded configuration file and hands every successfully
//! re-parsed configuration to a callback. Parse or validation failures keep
//! the previous configuration in place.

use std::path::Path;
use std::time::{Duration, Instant};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use super::{SpacesConfig, get_config_path, load_config_from_path};

/// Debounce duration for config file changes.
/// Some editors trigger multiple events per save (write to temp, rename, etc.).
const CONFIG_DEBOUNCE_MS: u64 = 200;

/// Starts watching the configuration file for changes.
///
/// Spawns a background thread. `on_change` runs on that thread with the
/// freshly loaded configuration.
pub fn watch_config_file<F>(on_change: F)
where
    F: Fn(SpacesConfig) + Send + 'static,
{
    let Some(config_path) = get_config_path().cloned() else {
        tracing::debug!("no configuration file loaded, skipping watcher");
        return;
    };

    std::thread::spawn(move || run_watcher(&config_path, &on_change));
}

fn run_watcher<F>(config_path: &Path, on_change: &F)
where
    F: Fn(SpacesConfig),
{
    let config_filename =
        config_path.file_name().map(std::ffi::OsStr::to_os_string).unwrap_or_default();
    let (tx, rx) = std::sync::mpsc::channel();

    let mut watcher: RecommendedWatcher = match notify::recommended_watcher(tx) {
        Ok(w) => w,
        Err(err) => {
            tracing::warn!(error = %err, "failed to create config watcher");
            return;
        }
    };

    // Watch the parent directory to catch editors that save via rename.
    let watch_path = config_path.parent().unwrap_or(config_path);

    if let Err(err) = watcher.watch(watch_path, RecursiveMode::NonRecursive) {
        tracing::warn!(error = %err, path = %watch_path.display(), "failed to watch config file");
        return;
    }

    let mut last_event_time: Option<Instant> = None;
    let debounce_duration = Duration::from_millis(CONFIG_DEBOUNCE_MS);

    loop {
        match rx.recv() {
            Ok(Ok(event)) => {
                let affects_config = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().is_some_and(|name| name == config_filename));

                if !affects_config {
                    continue;
                }

                let now = Instant::now();
                if last_event_time.is_some_and(|t| now.duration_since(t) < debounce_duration) {
                    continue;
                }
                last_event_time = Some(now);

                match load_config_from_path(config_path) {
                    Ok((config, _)) => {
                        tracing::info!(path = %config_path.display(), "configuration reloaded");
                        on_change(config);
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "ignoring invalid configuration change");
                    }
                }
            }
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "config watch error");
            }
            // Channel closed, watcher dropped
            Err(_) => break,
        }
    }
}

//! Display resolution.
//!
//! Maps a configured display name onto the set of currently connected
//! displays, and picks one display among several candidates for a newly
//! assigned app.

use super::state::{Display, DisplayId, MAIN_DISPLAY};

/// Returns the primary display (or the first connected one).
#[must_use]
pub fn main_display(connected: &[Display]) -> Option<&Display> {
    connected.iter().find(|d| d.is_main).or_else(|| connected.first())
}

/// Resolve a configured display name to a connected display.
///
/// Order:
/// 1. the configured display itself when connected
/// 2. `main`/`primary` as an alias for the primary display
/// 3. the first connected target of `alternatives` (`source=target` pairs)
/// 4. the display holding the key window
/// 5. the primary display
///
/// Returns `None` only when no display is connected.
#[must_use]
pub fn resolve(
    configured: &str,
    connected: &[Display],
    alternatives: &[(String, String)],
    key_window_display: Option<&DisplayId>,
) -> Option<DisplayId> {
    let is_connected = |name: &str| connected.iter().find(|d| d.id.as_str() == name);

    if let Some(display) = is_connected(configured) {
        return Some(display.id.clone());
    }

    if configured.eq_ignore_ascii_case(MAIN_DISPLAY) || configured.eq_ignore_ascii_case("primary")
    {
        return main_display(connected).map(|d| d.id.clone());
    }

    if let Some(alternative) = alternatives
        .iter()
        .filter(|(source, _)| source == configured)
        .find_map(|(_, target)| is_connected(target))
    {
        tracing::trace!(configured, alternative = %alternative.id, "spaces: using alternative display");
        return Some(alternative.id.clone());
    }

    if let Some(id) = key_window_display
        && connected.iter().any(|d| &d.id == id)
    {
        return Some(id.clone());
    }

    main_display(connected).map(|d| d.id.clone())
}

/// Pick one display among `candidates`.
///
/// Preference: the candidate that most recently held focus (`focus_history`
/// lists displays most recent last), then the display under the pointer,
/// then the first candidate.
#[must_use]
pub fn select_candidate(
    candidates: &[DisplayId],
    focus_history: &[DisplayId],
    cursor_display: Option<&DisplayId>,
) -> Option<DisplayId> {
    if let Some(recent) = focus_history.iter().rev().find(|d| candidates.contains(d)) {
        return Some(recent.clone());
    }

    if let Some(cursor) = cursor_display
        && candidates.contains(cursor)
    {
        return Some(cursor.clone());
    }

    candidates.first().cloned()
}

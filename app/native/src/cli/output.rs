//! Rendering helpers for the `config` and `workspaces` commands.

use std::fmt::Write as _;
use std::io::IsTerminal;

use colored::Colorize;
use serde::Serialize;
use serde_json::Value;

use crate::error::SpacesError;

const INDENT: &str = "  ";

/// Prints `value` as pretty JSON.
///
/// Output is colored only when stdout is a terminal, so piping into `jq`
/// or a file yields plain JSON.
///
/// # Errors
///
/// Returns an error if `value` cannot be represented as JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), SpacesError> {
    let value =
        serde_json::to_value(value).map_err(|e| SpacesError::InvalidArguments(e.to_string()))?;

    if std::io::stdout().is_terminal() {
        let mut out = String::new();
        render_colored(&value, 0, &mut out);
        println!("{out}");
    } else {
        let plain = serde_json::to_string_pretty(&value)
            .map_err(|e| SpacesError::InvalidArguments(e.to_string()))?;
        println!("{plain}");
    }
    Ok(())
}

/// Pretty-prints a JSON tree with keys, strings, numbers and literals in
/// distinct colors. Layout matches `serde_json::to_string_pretty`.
fn render_colored(value: &Value, depth: usize, out: &mut String) {
    let pad = INDENT.repeat(depth + 1);
    let closing_pad = INDENT.repeat(depth);

    match value {
        Value::Object(map) if !map.is_empty() => {
            out.push_str("{\n");
            for (i, (key, item)) in map.iter().enumerate() {
                let key = Value::String(key.clone()).to_string();
                let _ = write!(out, "{pad}{}: ", key.cyan());
                render_colored(item, depth + 1, out);
                out.push_str(if i + 1 < map.len() { ",\n" } else { "\n" });
            }
            let _ = write!(out, "{closing_pad}}}");
        }
        Value::Array(items) if !items.is_empty() => {
            out.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                out.push_str(&pad);
                render_colored(item, depth + 1, out);
                out.push_str(if i + 1 < items.len() { ",\n" } else { "\n" });
            }
            let _ = write!(out, "{closing_pad}]");
        }
        Value::Object(_) => out.push_str("{}"),
        Value::Array(_) => out.push_str("[]"),
        Value::String(_) => {
            let _ = write!(out, "{}", value.to_string().green());
        }
        Value::Number(n) => {
            let _ = write!(out, "{}", n.to_string().yellow());
        }
        Value::Bool(_) | Value::Null => {
            let _ = write!(out, "{}", value.to_string().magenta());
        }
    }
}

/// Joins app names for a table cell no wider than `width` characters.
///
/// Names are never cut in half: apps that do not fit are counted in a
/// trailing `+N` instead.
#[must_use]
pub fn summarize_apps(names: &[&str], width: usize) -> String {
    let full = names.join(", ");
    if full.chars().count() <= width {
        return full;
    }

    let mut shown = String::new();
    for (i, name) in names.iter().enumerate() {
        let rest = names.len() - i - 1;
        let candidate = if shown.is_empty() { (*name).to_string() } else { format!("{shown}, {name}") };
        let suffix = if rest == 0 { String::new() } else { format!(", +{rest}") };

        if candidate.chars().count() + suffix.chars().count() > width {
            let hidden = names.len() - i;
            return if shown.is_empty() { format!("+{hidden}") } else { format!("{shown}, +{hidden}") };
        }
        shown = candidate;
    }
    shown
}

/// Renders a boolean setting as `on`/`off`.
#[must_use]
pub fn on_off(value: bool) -> String {
    if value { "on".green().to_string() } else { "off".dimmed().to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(value: &Value) -> String {
        colored::control::set_override(false);
        let mut out = String::new();
        render_colored(value, 0, &mut out);
        out
    }

    #[test]
    fn test_render_matches_serde_layout() {
        let value = serde_json::json!({
            "name": "Dev",
            "apps": [{ "name": "Xcode", "bundleIdentifier": "com.apple.dt.Xcode" }],
            "icon": null,
            "id": 3,
            "empty": [],
            "nested": {}
        });

        assert_eq!(plain(&value), serde_json::to_string_pretty(&value).unwrap());
    }

    #[test]
    fn test_render_escapes_keys_and_strings() {
        let value = serde_json::json!({ "say \"hi\"": "line\nbreak" });
        assert_eq!(plain(&value), serde_json::to_string_pretty(&value).unwrap());
    }

    #[test]
    fn test_summarize_apps_fits() {
        assert_eq!(summarize_apps(&["Xcode", "Terminal"], 48), "Xcode, Terminal");
        assert_eq!(summarize_apps(&[], 10), "");
    }

    #[test]
    fn test_summarize_apps_counts_hidden_apps() {
        let names = ["Mail", "Slack", "Calendar", "Messages"];
        assert_eq!(summarize_apps(&names, 20), "Mail, Slack, +2");
    }

    #[test]
    fn test_summarize_apps_with_first_name_too_long() {
        assert_eq!(summarize_apps(&["Visual Studio Code", "Mail"], 8), "+2");
    }

    #[test]
    fn test_on_off() {
        colored::control::set_override(false);
        assert_eq!(on_off(true), "on");
        assert_eq!(on_off(false), "off");
    }
}

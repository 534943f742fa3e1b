//! Configuration template generation.
//!
//! Generates a commented configuration template with all available options.

use std::fs;
use std::path::Path;

/// Generates a configuration template with all options commented out.
///
/// The single uncommented profile keeps the file loadable as-is.
#[must_use]
pub fn generate_config_template() -> String {
    r##"// Spaces Configuration File
// ==========================
// This file uses JSONC format (JSON with comments).
// Options that are commented out show their default values.

{
  // Name of the profile loaded at startup (defaults to the first one).
  // "activeProfile": "Default",

  "profiles": [
    {
      "name": "Default",
      "workspaces": [
        // {
        //   "name": "Dev",
        //   // "main"/"primary" or a display name, ignored in dynamic mode
        //   "display": "main",
        //   "activateShortcut": "cmd+opt+1",
        //   "assignAppShortcut": "cmd+opt+shift+1",
        //   "apps": [
        //     { "name": "Xcode", "bundleIdentifier": "com.apple.dt.Xcode" }
        //   ],
        //   "appToFocus": { "name": "Xcode", "bundleIdentifier": "com.apple.dt.Xcode" },
        //   "icon": "hammer"
        // }
      ]
    }
  ]

  // "settings": {
  //   // "static" pins workspaces to displays, "dynamic" follows their apps
  //   "displayMode": "static",
  //
  //   // Fallback displays as "source=target" pairs separated by ";"
  //   "alternativeDisplays": "",
  //
  //   "changeWorkspaceOnAppAssign": true,
  //   "keepUnassignedAppsOnSwitch": false,
  //   "activateWorkspaceOnFocusChange": true,
  //   "loopWorkspaces": true,
  //   "skipEmptyWorkspacesOnSwitch": false,
  //   "centerCursorOnWorkspaceChange": false,
  //   "centerCursorOnFocusChange": false,
  //
  //   // Experimental: skip windows covered by other windows when moving focus
  //   "focusFrontmostWindow": false,
  //
  //   // Apps visible on every workspace of their display
  //   "floatingApps": [],
  //
  //   "pictureInPicture": {
  //     "enabled": true,
  //     "screenCornerOffset": 15,
  //     "apps": [
  //       // { "name": "IINA", "bundleIdentifier": "com.colliderli.iina", "pipWindowTitleRegex": "^PiP" }
  //     ]
  //   },
  //
  //   "fileManagerBundleId": "com.apple.finder"
  // }
}
"##
    .to_string()
}

/// Creates a configuration file with the template at the specified path.
///
/// Creates parent directories if they don't exist.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn create_config_file(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, generate_config_template())
}

//! Picture-in-Picture window detection rules.
//!
//! Browsers with a built-in PiP overlay are a closed set with fixed
//! heuristics. Anything else needs a user-configured title regex.

use regex::Regex;

use crate::config::PictureInPictureConfig;
use crate::modules::workspaces::state::WindowInfo;

/// Subrole used by browsers that present PiP as a system dialog.
const SYSTEM_DIALOG_SUBROLE: &str = "AXSystemDialog";

/// Apps with built-in PiP support.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KnownPipApp {
    Chrome,
    Vivaldi,
    Brave,
    Opera,
    Firefox,
    Zen,
    Arc,
    Dia,
}

impl KnownPipApp {
    /// Every known app, for iteration.
    pub const ALL: [Self; 8] = [
        Self::Chrome,
        Self::Vivaldi,
        Self::Brave,
        Self::Opera,
        Self::Firefox,
        Self::Zen,
        Self::Arc,
        Self::Dia,
    ];

    #[must_use]
    pub const fn bundle_id(self) -> &'static str {
        match self {
            Self::Chrome => "com.google.Chrome",
            Self::Vivaldi => "com.vivaldi.Vivaldi",
            Self::Brave => "com.brave.Browser",
            Self::Opera => "com.operasoftware.Opera",
            Self::Firefox => "org.mozilla.firefox",
            Self::Zen => "app.zen-browser.zen",
            Self::Arc => "company.thebrowser.Browser",
            Self::Dia => "company.thebrowser.dia",
        }
    }

    #[must_use]
    pub fn from_bundle_id(bundle_id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|app| app.bundle_id() == bundle_id)
    }

    /// Whether `window` is this app's PiP overlay.
    #[must_use]
    pub fn is_pip_window(self, window: &WindowInfo) -> bool {
        match self {
            Self::Chrome | Self::Vivaldi | Self::Brave | Self::Opera => {
                window.title == "Picture in Picture"
            }
            Self::Firefox | Self::Zen => window.title == "Picture-in-Picture",
            Self::Arc | Self::Dia => window.subrole == SYSTEM_DIALOG_SUBROLE,
        }
    }
}

/// How PiP windows of one app are recognized.
#[derive(Clone, Debug)]
pub enum PipRule {
    Known(KnownPipApp),
    TitleRegex(Regex),
}

impl PipRule {
    #[must_use]
    pub fn is_pip_window(&self, window: &WindowInfo) -> bool {
        match self {
            Self::Known(app) => app.is_pip_window(window),
            Self::TitleRegex(regex) => regex.is_match(&window.title),
        }
    }
}

/// Compiled user rules plus the known set.
#[derive(Clone, Debug, Default)]
pub struct PipRules {
    custom: Vec<(String, PipRule)>,
}

impl PipRules {
    /// Compile the user-configured rules.
    ///
    /// Invalid regexes are skipped with a warning.
    #[must_use]
    pub fn new(config: &PictureInPictureConfig) -> Self {
        let custom = config
            .apps
            .iter()
            .filter_map(|app| match Regex::new(&app.pip_window_title_regex) {
                Ok(regex) => Some((app.bundle_identifier.clone(), PipRule::TitleRegex(regex))),
                Err(err) => {
                    tracing::warn!(
                        bundle_id = %app.bundle_identifier,
                        error = %err,
                        "spaces: skipping invalid PiP title regex"
                    );
                    None
                }
            })
            .collect();

        Self { custom }
    }

    /// Rule for an app. User rules take precedence over the known set.
    #[must_use]
    pub fn rule_for(&self, bundle_id: &str) -> Option<PipRule> {
        self.custom
            .iter()
            .find(|(id, _)| id == bundle_id)
            .map(|(_, rule)| rule.clone())
            .or_else(|| KnownPipApp::from_bundle_id(bundle_id).map(PipRule::Known))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipAppConfig;
    use crate::modules::workspaces::state::Rect;

    fn window(title: &str, subrole: &str) -> WindowInfo {
        WindowInfo {
            id: 1,
            pid: 1,
            title: title.to_string(),
            subrole: subrole.to_string(),
            frame: Rect::new(0.0, 0.0, 320.0, 180.0),
            is_minimized: false,
        }
    }

    #[test]
    fn test_known_bundle_ids_round_trip() {
        for app in KnownPipApp::ALL {
            assert_eq!(KnownPipApp::from_bundle_id(app.bundle_id()), Some(app));
        }
        assert_eq!(KnownPipApp::from_bundle_id("com.apple.Safari"), None);
    }

    #[test]
    fn test_chromium_title_heuristic() {
        let pip = window("Picture in Picture", "AXStandardWindow");
        assert!(KnownPipApp::Chrome.is_pip_window(&pip));
        assert!(!KnownPipApp::Firefox.is_pip_window(&pip));
    }

    #[test]
    fn test_gecko_title_heuristic() {
        let pip = window("Picture-in-Picture", "AXStandardWindow");
        assert!(KnownPipApp::Zen.is_pip_window(&pip));
        assert!(!KnownPipApp::Brave.is_pip_window(&pip));
    }

    #[test]
    fn test_arc_subrole_heuristic() {
        assert!(KnownPipApp::Arc.is_pip_window(&window("", SYSTEM_DIALOG_SUBROLE)));
        assert!(!KnownPipApp::Dia.is_pip_window(&window("Space", "AXStandardWindow")));
    }

    #[test]
    fn test_custom_rule_overrides_known() {
        let config = PictureInPictureConfig {
            apps: vec![PipAppConfig {
                name: "Chrome".to_string(),
                bundle_identifier: "com.google.Chrome".to_string(),
                pip_window_title_regex: "^Mini".to_string(),
            }],
            ..Default::default()
        };
        let rules = PipRules::new(&config);
        let rule = rules.rule_for("com.google.Chrome").unwrap();

        assert!(rule.is_pip_window(&window("Mini player", "")));
        assert!(!rule.is_pip_window(&window("Picture in Picture", "")));
    }

    #[test]
    fn test_invalid_regex_is_skipped() {
        let config = PictureInPictureConfig {
            apps: vec![PipAppConfig {
                name: "IINA".to_string(),
                bundle_identifier: "com.colliderli.iina".to_string(),
                pip_window_title_regex: "(".to_string(),
            }],
            ..Default::default()
        };
        let rules = PipRules::new(&config);
        assert!(rules.rule_for("com.colliderli.iina").is_none());
    }
}

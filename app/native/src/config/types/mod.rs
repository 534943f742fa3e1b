//! Configuration types for Spaces.
//!
//! This module provides all configuration types organized by domain.
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

pub mod root;
pub mod settings;
pub mod workspaces;

// Root config types
pub use root::{ConfigError, SpacesConfig, config_paths, load_config, load_config_from_path};
// Settings types
pub use settings::{DisplayMode, PictureInPictureConfig, PipAppConfig, Settings};
// Workspace types
pub use workspaces::{AppRef, ProfileConfig, WorkspaceConfig};

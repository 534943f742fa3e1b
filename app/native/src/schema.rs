//! JSON Schema generation for the configuration file.

use crate::config::SpacesConfig;

/// Public location of the published schema.
const SCHEMA_ID: &str = "https://raw.githubusercontent.com/spaces-wm/spaces/main/spaces.schema.json";

/// Generates a JSON Schema for the Spaces configuration.
///
/// The schema includes all configuration options with their types,
/// descriptions, and default values.
#[must_use]
pub fn generate_schema() -> schemars::Schema {
    let mut schema = schemars::schema_for!(SpacesConfig);

    if let Some(obj) = schema.as_object_mut() {
        obj.insert("$id".to_string(), serde_json::json!(SCHEMA_ID));
    }

    schema
}

/// Pretty-printed JSON Schema, ready to be written to a file.
#[must_use]
pub fn print_schema() -> String {
    serde_json::to_string_pretty(&generate_schema()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_valid_json() {
        let parsed: serde_json::Value = serde_json::from_str(&print_schema()).unwrap();

        assert_eq!(parsed["$id"], SCHEMA_ID);
        assert_eq!(parsed["$schema"], "https://json-schema.org/draft/2020-12/schema");
        assert_eq!(parsed["title"], "SpacesConfig");
        assert!(parsed["properties"]["profiles"].is_object());
        assert!(parsed["properties"]["settings"].is_object());
    }

    #[test]
    fn test_schema_contains_nested_definitions() {
        let parsed: serde_json::Value = serde_json::from_str(&print_schema()).unwrap();

        assert!(parsed["$defs"]["WorkspaceConfig"].is_object());
        assert!(parsed["$defs"]["PictureInPictureConfig"].is_object());
        assert!(parsed["$defs"]["DisplayMode"].is_object());
    }

    #[test]
    fn test_schema_is_pretty_printed() {
        assert!(print_schema().contains('\n'));
    }
}

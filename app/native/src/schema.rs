//! JSON Schemas for the files Flamingo reads.

use schemars::Schema;

use crate::config::EngineConfig;
use crate::scenario::Scenario;

/// Which document to describe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SchemaKind {
    /// The configuration file.
    #[default]
    Config,
    /// Scenario files accepted by `flamingo replay`.
    Scenario,
}

/// Generates the JSON Schema of one document kind.
#[must_use]
pub fn generate_schema(kind: SchemaKind) -> Schema {
    match kind {
        SchemaKind::Config => schemars::schema_for!(EngineConfig),
        SchemaKind::Scenario => schemars::schema_for!(Scenario),
    }
}

/// Generates a pretty-printed JSON Schema string.
#[must_use]
pub fn generate_schema_json(kind: SchemaKind) -> String {
    serde_json::to_string_pretty(&generate_schema(kind)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(kind: SchemaKind) -> serde_json::Value {
        serde_json::from_str(&generate_schema_json(kind)).unwrap()
    }

    #[test]
    fn test_config_schema_uses_camel_case() {
        let schema = parsed(SchemaKind::Config);

        assert_eq!(schema["$schema"], "https://json-schema.org/draft/2020-12/schema");
        assert_eq!(schema["title"], "EngineConfig");
        assert!(schema["properties"]["snapDistance"].is_object());
        assert!(schema["properties"]["strictReopen"].is_object());
    }

    #[test]
    fn test_scenario_schema_describes_steps() {
        let schema = parsed(SchemaKind::Scenario);

        assert_eq!(schema["title"], "Scenario");
        assert!(schema["properties"]["steps"].is_object());
        assert!(schema["$defs"]["Action"].is_object());
        assert!(schema["$defs"]["NewObject"].is_object());
    }
}

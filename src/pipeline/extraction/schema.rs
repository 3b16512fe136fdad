use std::path::Path;

use jsonschema::Validator;
use serde_json::Value;

use super::ExtractionError;

/// Default clinical record schema shipped with the crate.
const DEFAULT_SCHEMA: &str = include_str!("../../../schema/medical_record.schema.json");

/// Loads and holds the target JSON schema for the process lifetime.
///
/// Holds three views of the same document: the raw `Value` (embedded in
/// vector-store payloads and prompts), a compiled validator, and a
/// pretty-printed string so prompt rendering never re-serializes.
pub struct SchemaStore {
    schema: Value,
    validator: Validator,
    pretty: String,
}

impl SchemaStore {
    /// Build a store from a schema document.
    pub fn new(schema: Value) -> Result<Self, ExtractionError> {
        let validator = Validator::new(&schema)
            .map_err(|e| ExtractionError::Schema(format!("invalid schema: {e}")))?;
        let pretty = serde_json::to_string_pretty(&schema)
            .map_err(|e| ExtractionError::Schema(e.to_string()))?;
        Ok(Self {
            schema,
            validator,
            pretty,
        })
    }

    /// The built-in medical record schema.
    pub fn builtin() -> Result<Self, ExtractionError> {
        let schema: Value = serde_json::from_str(DEFAULT_SCHEMA)
            .map_err(|e| ExtractionError::Schema(format!("built-in schema: {e}")))?;
        Self::new(schema)
    }

    /// Load a schema from a file path.
    pub fn load(path: &Path) -> Result<Self, ExtractionError> {
        let raw = std::fs::read_to_string(path)?;
        let schema: Value = serde_json::from_str(&raw)
            .map_err(|e| ExtractionError::Schema(format!("{}: {e}", path.display())))?;
        Self::new(schema)
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    pub fn pretty(&self) -> &str {
        &self.pretty
    }

    pub(crate) fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Declared schema version, defaulting to "1.0" when absent.
    pub fn version(&self) -> &str {
        self.schema
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or("1.0")
    }
}

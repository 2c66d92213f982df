//! Structural validation of persisted state.
//!
//! Every persisted slice is checked against a declarative JSON Schema before
//! it is trusted. A [`StateSchema`] compiles its schema once, and
//! [`validate_state_with_schema`] is the single routine all deserialize
//! paths go through.

use crate::error::{QueryError, Result};
use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde_json::{Value, json};
use std::fmt;

/// A JSON Schema compiled once at construction.
pub struct StateSchema {
    source: Value,
    compiled: std::result::Result<JSONSchema, String>,
}

impl StateSchema {
    /// Compiles `source`. A schema that fails to compile rejects every state.
    #[must_use]
    pub fn new(source: Value) -> Self {
        let compiled = JSONSchema::compile(&source).map_err(|e| format!("invalid schema: {e}"));
        Self { source, compiled }
    }

    /// The schema document.
    #[must_use]
    pub fn source(&self) -> &Value {
        &self.source
    }

    /// Checks `state`, collecting every violation.
    pub fn validate(&self, state: &Value) -> Result<()> {
        let compiled = self
            .compiled
            .as_ref()
            .map_err(|e| QueryError::SchemaValidation(e.clone()))?;

        let outcome: std::result::Result<(), Vec<String>> = compiled.validate(state).map_err(|errors| {
            errors
                .map(|e| format!("{}: {}", format_pointer(e.instance_path.to_string()), e))
                .collect()
        });

        outcome.map_err(|messages| QueryError::SchemaValidation(messages.join("; ")))
    }
}

impl fmt::Debug for StateSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateSchema")
            .field("source", &self.source)
            .field("compiled", &self.compiled.is_ok())
            .finish()
    }
}

/// Shape of a persisted [`ManagerRegistry`](crate::ManagerRegistry):
/// scope -> `{ data, options, queries? }`. Any string is a valid scope key.
pub static QUERIES_SCHEMA: Lazy<StateSchema> = Lazy::new(|| {
    StateSchema::new(json!({
        "type": "object",
        "additionalProperties": {
            "type": "object",
            "required": ["data", "options"],
            "properties": {
                "data": {
                    "type": "object",
                    "additionalProperties": { "type": "object" }
                },
                "options": {
                    "type": "object",
                    "required": ["itemKey"],
                    "properties": {
                        "itemKey": { "type": "string", "minLength": 1 }
                    }
                },
                "queries": {
                    "type": "object",
                    "additionalProperties": {
                        "type": "object",
                        "required": ["itemKeys"],
                        "properties": {
                            "itemKeys": {
                                "type": "array",
                                "items": { "type": ["string", "null"] }
                            },
                            "found": { "type": "integer", "minimum": 0 }
                        }
                    }
                }
            }
        }
    }))
});

/// Checks `state` against `schema`, collecting every violation.
pub fn validate_state_with_schema(state: &Value, schema: &StateSchema) -> Result<()> {
    schema.validate(state)
}

/// Boolean form of [`validate_state_with_schema`].
#[must_use]
pub fn is_valid_state_with_schema(state: &Value, schema: &StateSchema) -> bool {
    schema.validate(state).is_ok()
}

fn format_pointer(pointer: String) -> String {
    if pointer.is_empty() { "/".into() } else { pointer }
}

use calypso_query::schema::StateSchema;
use once_cell::sync::Lazy;
use serde_json::json;

/// Shape of the persisted active themes: site -> theme ID.
pub static ACTIVE_THEMES_SCHEMA: Lazy<StateSchema> = Lazy::new(|| {
    StateSchema::new(json!({
        "type": "object",
        "additionalProperties": { "type": "string", "minLength": 1 }
    }))
});

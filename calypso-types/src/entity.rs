use crate::{Error, ItemKey};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A server-fetched record held in a query manager, e.g. a theme.
///
/// The payload is an arbitrary JSON object. The core only ever looks at the
/// identifier field configured on the manager; every other attribute is
/// opaque to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Entity {
    data: Value,
}

impl Entity {
    /// Wraps a JSON value, which must be an object.
    pub fn from_value(data: Value) -> Result<Self, Error> {
        if data.is_object() {
            Ok(Self { data })
        } else {
            Err(Error::NotAnObject)
        }
    }

    /// Builds an entity from an object map.
    #[must_use]
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self {
            data: Value::Object(map),
        }
    }

    /// Returns the usable identifier stored under `field`, if any.
    #[must_use]
    pub fn item_key(&self, field: &str) -> Option<ItemKey> {
        self.data.get(field).and_then(ItemKey::from_value)
    }

    /// Returns a top-level attribute.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// Extract a string value using a JSON pointer (e.g., "/name").
    pub fn get_str(&self, pointer: &str) -> Option<&str> {
        self.data.pointer(pointer).and_then(|v| v.as_str())
    }

    /// Extract a boolean value using a JSON pointer.
    pub fn get_bool(&self, pointer: &str) -> Option<bool> {
        self.data.pointer(pointer).and_then(|v| v.as_bool())
    }

    /// Extract a numeric value using a JSON pointer.
    pub fn get_number(&self, pointer: &str) -> Option<f64> {
        self.data.pointer(pointer).and_then(|v| v.as_f64())
    }

    /// Borrows the underlying JSON object.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.data
    }

    /// Consumes the entity, returning the JSON object.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.data
    }
}

impl TryFrom<Value> for Entity {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<Entity> for Value {
    fn from(entity: Entity) -> Self {
        entity.data
    }
}

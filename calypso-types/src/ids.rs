//! Identifier types used throughout the themes state core.
//!
//! Both identifiers are string-backed because they end up as JSON object
//! keys in persisted state.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Canonical identifier of an entity within a query manager.
///
/// Built from the value of the manager's configured identifier field.
/// JSON strings are used verbatim and JSON numbers use their decimal
/// rendering, so `{"id": 7}` and `{"id": "7"}` address the same record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ItemKey(String);

impl ItemKey {
    /// Creates an item key from its canonical string form.
    ///
    /// Returns `None` for the empty string, which is never a usable identifier.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.is_empty() { None } else { Some(Self(key)) }
    }

    /// Extracts an item key from an identifier field value.
    ///
    /// Only non-empty strings and numbers qualify. `null`, booleans, arrays
    /// and objects yield `None`.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::new(s.as_str()),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }

    /// Returns the canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for ItemKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawId::deserialize(deserializer)?.into_string();
        Self::new(raw).ok_or_else(|| de::Error::custom("identifier must not be empty"))
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for ItemKey {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl FromStr for ItemKey {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or(crate::Error::EmptyIdentifier)
    }
}

/// Isolation boundary for entity data and query indexes, usually a site ID.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ScopeId(String);

impl ScopeId {
    /// Creates a scope ID.
    #[must_use]
    pub fn new(scope: impl Into<String>) -> Self {
        Self(scope.into())
    }

    /// Returns the scope as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for ScopeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self(RawId::deserialize(deserializer)?.into_string()))
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for ScopeId {
    fn from(site_id: u64) -> Self {
        Self(site_id.to_string())
    }
}

impl From<&str> for ScopeId {
    fn from(scope: &str) -> Self {
        Self(scope.to_string())
    }
}

impl From<String> for ScopeId {
    fn from(scope: String) -> Self {
        Self(scope)
    }
}

/// Identifiers arrive as JSON strings or numbers (site IDs usually are numbers).
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}

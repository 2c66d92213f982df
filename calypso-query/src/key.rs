//! Query key normalization.
//!
//! Turns a [`Query`] (plus an optional scope) into the canonical string used
//! to index query results. The output is a compact JSON object with sorted
//! parameter names, prefixed by `"<scope>:"` when a scope is given:
//!
//! ```text
//! {"filter":["blog","dark"],"search":"x"}
//! 2916284:{"search":"x"}
//! ```
//!
//! Normalization never fails. `null` parameters and parameters equal to their
//! configured default are dropped, array values are sorted unless their order
//! is declared significant, and any other value is rendered as canonical JSON.

use calypso_types::{Query, ScopeId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write as _;

/// Canonical string form of a query, used as an index key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryKey(String);

impl QueryKey {
    /// Wraps an already-normalized key, e.g. one read back from persisted state.
    #[must_use]
    pub fn from_normalized(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-manager knobs for key normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyOptions {
    /// Array-valued parameters whose element order is significant.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ordered_params: Vec<String>,
    /// Parameter values that mean the same as leaving the parameter out.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub defaults: BTreeMap<String, Value>,
}

impl KeyOptions {
    /// Normalizes `query` under these options.
    #[must_use]
    pub fn normalize(&self, query: &Query, scope: Option<&ScopeId>) -> QueryKey {
        let mut out = String::new();
        if let Some(scope) = scope {
            out.push_str(scope.as_str());
            out.push(':');
        }

        out.push('{');
        let mut first = true;
        for (name, value) in query.iter() {
            if value.is_null() || self.defaults.get(name) == Some(value) {
                continue;
            }
            if !first {
                out.push(',');
            }
            first = false;
            write_string(&mut out, name);
            out.push(':');
            match value {
                Value::Array(items) if !self.ordered_params.iter().any(|p| p == name) => {
                    write_sorted_array(&mut out, items);
                }
                other => write_canonical(&mut out, other),
            }
        }
        out.push('}');

        QueryKey(out)
    }
}

/// Normalizes `query` with default options: no ignored defaults and every
/// array treated as an unordered set.
#[must_use]
pub fn normalize(query: &Query, scope: Option<&ScopeId>) -> QueryKey {
    KeyOptions::default().normalize(query, scope)
}

fn write_sorted_array(out: &mut String, items: &[Value]) {
    let mut rendered: Vec<String> = items
        .iter()
        .map(|item| {
            let mut s = String::new();
            write_canonical(&mut s, item);
            s
        })
        .collect();
    rendered.sort();

    out.push('[');
    out.push_str(&rendered.join(","));
    out.push(']');
}

// Object keys are sorted explicitly: serde_json maps keep insertion order
// under `preserve_order`.
fn write_canonical(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => {
            let _ = write!(out, "{b}");
        }
        Value::Number(n) => {
            let _ = write!(out, "{n}");
        }
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (k, v)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(out, k);
                out.push(':');
                write_canonical(out, v);
            }
            out.push('}');
        }
    }
}

fn write_string(out: &mut String, s: &str) {
    let _ = write!(out, "{}", Value::String(s.to_owned()));
}

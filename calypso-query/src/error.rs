//! Error types for the query layer.

use crate::QueryKey;
use calypso_types::ItemKey;
use thiserror::Error;

/// Result type for query layer operations.
pub type Result<T> = std::result::Result<T, QueryError>;

/// Errors that can occur in query layer operations.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A received entity has no usable identifier. The whole batch is rejected.
    #[error("entity at position {index} has no usable `{field}` identifier")]
    InvalidEntity { index: usize, field: String },

    /// A persisted entity is stored under a key its identifier does not match.
    #[error("entity stored as `{key}` does not carry a matching `{field}` identifier")]
    MismatchedItemKey { key: ItemKey, field: String },

    /// A persisted query index points at an entity that is not in the store.
    #[error("query `{query}` references unknown item `{key}`")]
    DanglingReference { query: QueryKey, key: ItemKey },

    /// Persisted state does not match its structural schema.
    #[error("schema validation failed: {0}")]
    SchemaValidation(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

//! Core type definitions for the Calypso themes state core.
//!
//! This crate defines the plugin-agnostic vocabulary shared by the query
//! layer and the reducers:
//! - [`ItemKey`] and [`ScopeId`] identifiers
//! - [`Entity`], an opaque JSON record with a configurable identifier field
//! - [`Query`] and [`QueryContext`] fetch descriptors
//!
//! Nothing here knows what a theme looks like.

mod entity;
mod ids;
mod query;

pub use entity::Entity;
pub use ids::{ItemKey, ScopeId};
pub use query::{Query, QueryContext};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("entity is not a JSON object")]
    NotAnObject,

    #[error("identifier must not be empty")]
    EmptyIdentifier,
}

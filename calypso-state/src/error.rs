use calypso_query::QueryError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StateError>;

/// Errors raised while reducing, persisting or configuring themes state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("activated theme has no usable `{field}` identifier")]
    InvalidTheme { field: String },

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

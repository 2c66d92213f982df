//! Query-result caching and normalization for server-fetched entities.
//!
//! This crate is the read-through cache the themes reducers sit on:
//! - [`QueryManager`]: an entity store keyed by [`ItemKey`](calypso_types::ItemKey)
//!   plus an index of query results pointing into it
//! - [`normalize`] / [`KeyOptions`]: order-independent query keys
//! - [`ManagerRegistry`]: one lazily created manager per scope (site)
//! - [`PersistedManager`] and the registry's `serialize` / `deserialize`:
//!   persistence guarded by [`schema`] validation
//!
//! Every value here is immutable. Operations that change nothing hand back
//! the same `Arc`, which is how consumers detect change cheaply.

mod error;
mod index;
mod key;
mod manager;
mod options;
mod pagination;
mod persist;
mod registry;
pub mod schema;

pub use error::{QueryError, Result};
pub use index::IndexedQuery;
pub use key::{KeyOptions, QueryKey, normalize};
pub use manager::QueryManager;
pub use options::ManagerOptions;
pub use pagination::{DEFAULT_PER_PAGE, MAX_INDEXED_SLOTS, PaginationOptions};
pub use persist::PersistedManager;
pub use registry::ManagerRegistry;

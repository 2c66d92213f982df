//! Persisted projection of managers and registries.
//!
//! A manager persists as `{ data, options }`, plus `queries` when pagination
//! state should survive a reload. Restoring is fail-safe: the blob is checked
//! against [`QUERIES_SCHEMA`] and every manager is rebuilt with full
//! identifier and reference checks. Any failure discards the whole blob.

use crate::error::Result;
use crate::index::IndexedQuery;
use crate::key::QueryKey;
use crate::manager::QueryManager;
use crate::options::ManagerOptions;
use crate::registry::ManagerRegistry;
use crate::schema::{QUERIES_SCHEMA, validate_state_with_schema};
use calypso_types::{Entity, ItemKey, ScopeId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Persistable shape of one manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedManager {
    pub data: BTreeMap<ItemKey, Entity>,
    pub options: ManagerOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queries: Option<BTreeMap<QueryKey, IndexedQuery>>,
}

impl QueryManager {
    /// Projects the manager to its persistable shape.
    #[must_use]
    pub fn to_persisted(&self, include_queries: bool) -> PersistedManager {
        PersistedManager {
            data: self
                .items()
                .map(|(key, entity)| (key.clone(), entity.clone()))
                .collect(),
            options: self.options().clone(),
            queries: include_queries.then(|| {
                self.queries()
                    .map(|(key, result)| (key.clone(), result.clone()))
                    .collect()
            }),
        }
    }

    /// Rebuilds a manager from its persisted shape.
    pub fn from_persisted(persisted: PersistedManager) -> Result<Self> {
        Self::from_parts(
            persisted.data,
            persisted.queries.unwrap_or_default(),
            persisted.options,
        )
    }
}

impl ManagerRegistry {
    /// Serializes every manager, keyed by scope.
    pub fn serialize(&self, include_queries: bool) -> Result<Value> {
        let persisted: BTreeMap<&ScopeId, PersistedManager> = self
            .iter()
            .map(|(scope, manager)| (scope, manager.to_persisted(include_queries)))
            .collect();
        Ok(serde_json::to_value(persisted)?)
    }

    /// Restores a registry, failing on the first problem found.
    ///
    /// `options` apply to managers created later for new scopes. Restored
    /// managers keep the options they were persisted with.
    pub fn try_deserialize(state: &Value, options: ManagerOptions) -> Result<Self> {
        validate_state_with_schema(state, &QUERIES_SCHEMA)?;

        let persisted: BTreeMap<ScopeId, PersistedManager> =
            serde_json::from_value(state.clone())?;
        let managers = persisted
            .into_iter()
            .map(|(scope, manager)| Ok((scope, Arc::new(QueryManager::from_persisted(manager)?))))
            .collect::<Result<BTreeMap<_, _>>>()?;

        debug!(scopes = managers.len(), "Restored query managers");
        Ok(Self::from_managers(managers, options))
    }

    /// Restores a registry, or returns an empty one if the blob is unusable.
    #[must_use]
    pub fn deserialize(state: &Value, options: ManagerOptions) -> Self {
        match Self::try_deserialize(state, options.clone()) {
            Ok(registry) => registry,
            Err(e) => {
                warn!(error = %e, "Discarding persisted query managers");
                Self::new(options)
            }
        }
    }
}

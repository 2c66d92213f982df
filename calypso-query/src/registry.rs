//! Per-scope query managers.
//!
//! A [`ManagerRegistry`] maps each scope (site) to its own [`QueryManager`].
//! Managers are created lazily on the first write for a scope. Like the
//! managers it holds, the registry is an immutable value: an operation that
//! leaves a manager untouched returns a registry sharing the same map.

use crate::error::Result;
use crate::manager::QueryManager;
use crate::options::ManagerOptions;
use calypso_types::{Entity, ItemKey, Query, QueryContext, ScopeId};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Mapping from scope ID to an independent query manager.
#[derive(Debug, Clone, Default)]
pub struct ManagerRegistry {
    managers: Arc<BTreeMap<ScopeId, Arc<QueryManager>>>,
    options: Arc<ManagerOptions>,
}

impl ManagerRegistry {
    /// Creates an empty registry whose new managers use `options`.
    #[must_use]
    pub fn new(options: ManagerOptions) -> Self {
        Self {
            managers: Arc::default(),
            options: Arc::new(options),
        }
    }

    /// Creates a registry from already-built managers.
    #[must_use]
    pub fn from_managers(
        managers: BTreeMap<ScopeId, Arc<QueryManager>>,
        options: ManagerOptions,
    ) -> Self {
        Self {
            managers: Arc::new(managers),
            options: Arc::new(options),
        }
    }

    /// Applies `op` to the manager of `scope`.
    ///
    /// - unknown scope and `create_if_absent == false`: returns `self` unchanged;
    /// - unknown scope and `create_if_absent == true`: `op` runs on a fresh
    ///   manager built from the registry options, which is then stored;
    /// - `op` returns the same manager: returns `self` unchanged;
    /// - otherwise only the entry for `scope` is replaced.
    ///
    /// Errors from `op` leave the registry as it was.
    pub fn apply_to_manager<F, E>(&self, scope: &ScopeId, create_if_absent: bool, op: F) -> std::result::Result<Self, E>
    where
        F: FnOnce(&Arc<QueryManager>) -> std::result::Result<Arc<QueryManager>, E>,
    {
        let next = match self.managers.get(scope) {
            Some(current) => {
                let next = op(current)?;
                if Arc::ptr_eq(&next, current) {
                    return Ok(self.clone());
                }
                next
            }
            None if create_if_absent => {
                debug!(scope = %scope, "Creating query manager");
                op(&Arc::new(QueryManager::new((*self.options).clone())))?
            }
            None => return Ok(self.clone()),
        };

        let mut managers = Arc::clone(&self.managers);
        Arc::make_mut(&mut managers).insert(scope.clone(), next);
        Ok(Self {
            managers,
            options: Arc::clone(&self.options),
        })
    }

    /// Receives entities for `scope`, creating its manager if needed.
    pub fn receive(
        &self,
        scope: &ScopeId,
        items: &[Entity],
        context: Option<&QueryContext>,
    ) -> Result<Self> {
        self.apply_to_manager(scope, true, |manager| manager.receive(items, context))
    }

    /// The manager of `scope`, if one was created.
    #[must_use]
    pub fn get(&self, scope: &ScopeId) -> Option<&Arc<QueryManager>> {
        self.managers.get(scope)
    }

    /// Looks up one entity.
    #[must_use]
    pub fn get_item(&self, scope: &ScopeId, key: &ItemKey) -> Option<&Entity> {
        self.get(scope)?.get(key)
    }

    /// Looks up the results of a query.
    #[must_use]
    pub fn get_items(&self, scope: &ScopeId, query: &Query) -> Option<Vec<&Entity>> {
        self.get(scope)?.get_items(query)
    }

    /// Looks up the found count of a query.
    #[must_use]
    pub fn get_found(&self, scope: &ScopeId, query: &Query) -> Option<u64> {
        self.get(scope)?.get_found(query)
    }

    /// Iterates managers in scope order.
    pub fn iter(&self) -> impl Iterator<Item = (&ScopeId, &Arc<QueryManager>)> {
        self.managers.iter()
    }

    /// Number of scopes with a manager.
    #[must_use]
    pub fn len(&self) -> usize {
        self.managers.len()
    }

    /// True when no scope has a manager.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }

    /// Options used for managers created by this registry.
    #[must_use]
    pub fn options(&self) -> &ManagerOptions {
        &self.options
    }

    /// True when both registries share the same manager map.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.managers, &other.managers)
    }
}

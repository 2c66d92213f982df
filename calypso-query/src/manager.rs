//! The query manager: an entity store plus a query index over it.
//!
//! A [`QueryManager`] is an immutable value. [`QueryManager::receive`] returns
//! a new `Arc<QueryManager>` when anything changed and the very same `Arc`
//! otherwise, so callers can detect "nothing happened" with `Arc::ptr_eq`.
//!
//! Both maps sit behind their own `Arc`. A receive that only touches entities
//! shares the query map with its predecessor and vice versa.

use crate::error::{QueryError, Result};
use crate::index::IndexedQuery;
use crate::key::QueryKey;
use crate::options::ManagerOptions;
use calypso_types::{Entity, ItemKey, Query, QueryContext};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Normalized entity store with a secondary index of query results.
#[derive(Debug, Clone, Default)]
pub struct QueryManager {
    data: Arc<HashMap<ItemKey, Arc<Entity>>>,
    queries: Arc<HashMap<QueryKey, Arc<IndexedQuery>>>,
    options: Arc<ManagerOptions>,
}

impl QueryManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new(options: ManagerOptions) -> Self {
        Self {
            data: Arc::default(),
            queries: Arc::default(),
            options: Arc::new(options),
        }
    }

    /// Creates a manager seeded with previously stored entities and queries.
    ///
    /// Every entity must carry an identifier equal to the key it is stored
    /// under, and every indexed key must resolve to a stored entity.
    pub fn from_parts(
        data: impl IntoIterator<Item = (ItemKey, Entity)>,
        queries: impl IntoIterator<Item = (QueryKey, IndexedQuery)>,
        options: ManagerOptions,
    ) -> Result<Self> {
        let mut store = HashMap::new();
        for (key, entity) in data {
            if entity.item_key(&options.item_key).as_ref() != Some(&key) {
                return Err(QueryError::MismatchedItemKey {
                    key,
                    field: options.item_key.clone(),
                });
            }
            store.insert(key, Arc::new(entity));
        }

        let mut index = HashMap::new();
        for (query, result) in queries {
            if let Some(missing) = result.item_keys().find(|key| !store.contains_key(*key)) {
                return Err(QueryError::DanglingReference {
                    key: missing.clone(),
                    query,
                });
            }
            index.insert(query, Arc::new(result));
        }

        Ok(Self {
            data: Arc::new(store),
            queries: Arc::new(index),
            options: Arc::new(options),
        })
    }

    /// Merges received entities, and the query they answer if given.
    ///
    /// Each entity replaces any stored record with the same identifier. With
    /// a context, the query's index entry is replaced by the received keys in
    /// order (or, for paginated managers, the page is spliced in). Without
    /// one, no query entry is touched.
    ///
    /// The batch is all-or-nothing: if any entity lacks a usable identifier
    /// nothing is merged and [`QueryError::InvalidEntity`] names the first
    /// offender.
    pub fn receive(
        self: &Arc<Self>,
        items: &[Entity],
        context: Option<&QueryContext>,
    ) -> Result<Arc<Self>> {
        let field = &self.options.item_key;
        let keyed = items
            .iter()
            .enumerate()
            .map(|(index, entity)| {
                entity
                    .item_key(field)
                    .map(|key| (key, entity))
                    .ok_or_else(|| QueryError::InvalidEntity {
                        index,
                        field: field.clone(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut data = Arc::clone(&self.data);
        for (key, entity) in &keyed {
            if data.get(key).is_some_and(|stored| stored.as_ref() == *entity) {
                continue;
            }
            Arc::make_mut(&mut data).insert(key.clone(), Arc::new((*entity).clone()));
        }

        let mut queries = Arc::clone(&self.queries);
        if let Some(context) = context {
            let query_key = self.query_key(&context.query);
            let existing = self.queries.get(&query_key).map(Arc::as_ref);
            let keys: Vec<ItemKey> = keyed.iter().map(|(key, _)| key.clone()).collect();
            let next = match &self.options.pagination {
                Some(pagination) => IndexedQuery::merge_page(
                    existing,
                    pagination,
                    &context.query,
                    keys,
                    context.found,
                ),
                None => IndexedQuery::new(keys, context.found),
            };
            if existing != Some(&next) {
                debug!(query = %query_key, items = keyed.len(), found = ?context.found, "Indexed query results");
                Arc::make_mut(&mut queries).insert(query_key, Arc::new(next));
            }
        }

        if Arc::ptr_eq(&data, &self.data) && Arc::ptr_eq(&queries, &self.queries) {
            debug!(items = keyed.len(), "Receive left manager unchanged");
            return Ok(Arc::clone(self));
        }

        Ok(Arc::new(Self {
            data,
            queries,
            options: Arc::clone(&self.options),
        }))
    }

    /// Returns the entity stored under `key`.
    #[must_use]
    pub fn get(&self, key: &ItemKey) -> Option<&Entity> {
        self.data.get(key).map(Arc::as_ref)
    }

    /// Returns the results of `query`.
    ///
    /// `None` means no fetch for this query (or, when paginated, for this
    /// page) has completed. `Some` with an empty vector means the fetch
    /// completed with zero results.
    #[must_use]
    pub fn get_items(&self, query: &Query) -> Option<Vec<&Entity>> {
        let result = self.queries.get(&self.query_key(query))?;
        let slots = result.slots();
        match &self.options.pagination {
            Some(pagination) => {
                let range = pagination.page_range(query);
                let page = &slots[range.start.min(slots.len())..range.end.min(slots.len())];
                self.resolve(page)
            }
            None => self.resolve(slots),
        }
    }

    /// Returns every fetched result of `query` regardless of page.
    #[must_use]
    pub fn get_items_ignoring_page(&self, query: &Query) -> Option<Vec<&Entity>> {
        let result = self.queries.get(&self.query_key(query))?;
        Some(result.item_keys().filter_map(|key| self.get(key)).collect())
    }

    /// Returns the server-reported total for `query`.
    #[must_use]
    pub fn get_found(&self, query: &Query) -> Option<u64> {
        self.queries.get(&self.query_key(query))?.found()
    }

    /// Returns how many pages the results of `query` span.
    ///
    /// Unpaginated managers hold every result on a single page.
    #[must_use]
    pub fn get_number_of_pages(&self, query: &Query) -> Option<u64> {
        let found = self.get_found(query)?;
        Some(match &self.options.pagination {
            Some(pagination) => pagination.number_of_pages(query, found),
            None => u64::from(found > 0),
        })
    }

    /// The index key `query` is stored under in this manager.
    #[must_use]
    pub fn query_key(&self, query: &Query) -> QueryKey {
        match &self.options.pagination {
            Some(pagination) => self.options.keys.normalize(&pagination.strip(query), None),
            None => self.options.keys.normalize(query, None),
        }
    }

    /// The index entry stored under `key`.
    #[must_use]
    pub fn indexed(&self, key: &QueryKey) -> Option<&IndexedQuery> {
        self.queries.get(key).map(Arc::as_ref)
    }

    /// Iterates stored entities in arbitrary order.
    pub fn items(&self) -> impl Iterator<Item = (&ItemKey, &Entity)> {
        self.data.iter().map(|(key, entity)| (key, entity.as_ref()))
    }

    /// Iterates index entries in arbitrary order.
    pub fn queries(&self) -> impl Iterator<Item = (&QueryKey, &IndexedQuery)> {
        self.queries.iter().map(|(key, result)| (key, result.as_ref()))
    }

    /// Number of stored entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when no entity is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of indexed queries.
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.queries.len()
    }

    /// The options this manager was built with.
    #[must_use]
    pub fn options(&self) -> &ManagerOptions {
        &self.options
    }

    fn resolve(&self, slots: &[Option<ItemKey>]) -> Option<Vec<&Entity>> {
        slots
            .iter()
            .map(|slot| slot.as_ref().and_then(|key| self.get(key)))
            .collect()
    }
}


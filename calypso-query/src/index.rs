//! Query index entries and the merge rules for incoming results.

use crate::pagination::{MAX_INDEXED_SLOTS, PaginationOptions, to_usize};
use calypso_types::{ItemKey, Query};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The stored result of one query: ordered item keys plus the found count.
///
/// Slots are `None` only in paginated managers, for positions whose page has
/// not been fetched yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedQuery {
    item_keys: Vec<Option<ItemKey>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    found: Option<u64>,
}

impl IndexedQuery {
    /// A complete result in server order.
    #[must_use]
    pub fn new(keys: Vec<ItemKey>, found: Option<u64>) -> Self {
        Self {
            item_keys: keys.into_iter().map(Some).collect(),
            found,
        }
    }

    /// All slots, including unfetched ones.
    #[must_use]
    pub fn slots(&self) -> &[Option<ItemKey>] {
        &self.item_keys
    }

    /// Fetched item keys in order, skipping unfetched slots.
    pub fn item_keys(&self) -> impl Iterator<Item = &ItemKey> {
        self.item_keys.iter().flatten()
    }

    /// Server-reported total count.
    #[must_use]
    pub fn found(&self) -> Option<u64> {
        self.found
    }

    /// Merges one fetched page into `existing`.
    ///
    /// Received keys are removed from any other position first, so an item
    /// that moved between pages is listed once. A known `found` count sets
    /// the length of the result. Positions at or past `found` (or past
    /// [`MAX_INDEXED_SLOTS`]) are not indexed.
    pub(crate) fn merge_page(
        existing: Option<&IndexedQuery>,
        pagination: &PaginationOptions,
        query: &Query,
        keys: Vec<ItemKey>,
        found: Option<u64>,
    ) -> IndexedQuery {
        let start = pagination.page_range(query).start;
        let found = found.or_else(|| existing.and_then(|e| e.found));
        let received: HashSet<&ItemKey> = keys.iter().collect();

        let mut slots: Vec<Option<ItemKey>> = existing
            .map(|e| {
                e.item_keys
                    .iter()
                    .map(|slot| slot.clone().filter(|key| !received.contains(key)))
                    .collect()
            })
            .unwrap_or_default();

        let limit = found.map_or(MAX_INDEXED_SLOTS, |found| to_usize(found).min(MAX_INDEXED_SLOTS));
        let end = start.saturating_add(keys.len()).min(limit);
        if start < end && slots.len() < end {
            slots.resize(end, None);
        }
        for (position, key) in (start..end).zip(&keys) {
            slots[position] = Some(key.clone());
        }
        if found.is_some() {
            slots.resize(limit, None);
        }

        IndexedQuery {
            item_keys: slots,
            found,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(ids: &[u64]) -> Vec<ItemKey> {
        ids.iter().copied().map(ItemKey::from).collect()
    }

    fn paged(page: u64) -> Query {
        Query::new().with("page", page).with("number", 2)
    }

    #[test]
    fn first_page_with_found_leaves_holes() {
        let merged = IndexedQuery::merge_page(
            None,
            &PaginationOptions::default(),
            &paged(1),
            keys(&[1, 2]),
            Some(5),
        );
        assert_eq!(merged.slots().len(), 5);
        assert_eq!(merged.item_keys().count(), 2);
        assert_eq!(merged.found(), Some(5));
    }

    #[test]
    fn later_page_keeps_earlier_pages() {
        let options = PaginationOptions::default();
        let first = IndexedQuery::merge_page(None, &options, &paged(1), keys(&[1, 2]), Some(4));
        let second =
            IndexedQuery::merge_page(Some(&first), &options, &paged(2), keys(&[3, 4]), None);
        assert_eq!(second.item_keys().cloned().collect::<Vec<_>>(), keys(&[1, 2, 3, 4]));
        assert_eq!(second.found(), Some(4));
    }

    #[test]
    fn moved_item_is_listed_once() {
        let options = PaginationOptions::default();
        let first = IndexedQuery::merge_page(None, &options, &paged(1), keys(&[1, 2]), Some(4));
        let second =
            IndexedQuery::merge_page(Some(&first), &options, &paged(2), keys(&[2, 3]), Some(4));
        assert_eq!(
            second.slots(),
            &[Some(ItemKey::from(1)), None, Some(ItemKey::from(2)), Some(ItemKey::from(3))]
        );
    }

    #[test]
    fn page_at_or_past_found_allocates_nothing() {
        let options = PaginationOptions::default();
        let huge = Query::new().with("page", u64::MAX).with("number", 2);
        let merged = IndexedQuery::merge_page(None, &options, &huge, keys(&[1, 2]), Some(3));
        assert_eq!(merged.slots().len(), 3);
        assert_eq!(merged.item_keys().count(), 0);
    }

    #[test]
    fn unbounded_page_is_capped() {
        let options = PaginationOptions::default();
        let huge = Query::new().with("page", u64::MAX);
        let merged = IndexedQuery::merge_page(None, &options, &huge, keys(&[1]), None);
        assert!(merged.slots().is_empty());

        let empty = IndexedQuery::merge_page(None, &options, &huge, Vec::new(), None);
        assert!(empty.slots().is_empty());
    }

    #[test]
    fn huge_found_is_capped() {
        let options = PaginationOptions::default();
        let merged = IndexedQuery::merge_page(None, &options, &paged(1), keys(&[1, 2]), Some(u64::MAX));
        assert_eq!(merged.slots().len(), MAX_INDEXED_SLOTS);
        assert_eq!(merged.found(), Some(u64::MAX));
    }

    #[test]
    fn smaller_found_truncates() {
        let options = PaginationOptions::default();
        let first = IndexedQuery::merge_page(None, &options, &paged(1), keys(&[1, 2]), Some(6));
        let again = IndexedQuery::merge_page(Some(&first), &options, &paged(1), keys(&[1, 2]), Some(2));
        assert_eq!(again.slots().len(), 2);
    }
}

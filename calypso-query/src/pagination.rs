//! Page-aware query indexing.
//!
//! When a manager is paginated, the page and per-page parameters are not
//! part of the query key. Every page of a query lands in one index entry at
//! offset `(page - 1) * per_page`, and unfetched positions stay empty.

use calypso_types::Query;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Default number of results per page.
pub const DEFAULT_PER_PAGE: u64 = 20;

/// Upper bound on the slots of one paginated index entry. Results received
/// for positions past it are stored but not indexed.
pub const MAX_INDEXED_SLOTS: usize = 100_000;

/// Names and defaults of the pagination parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationOptions {
    #[serde(default = "default_page_param")]
    pub page_param: String,
    #[serde(default = "default_per_page_param")]
    pub per_page_param: String,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page_param() -> String {
    "page".to_string()
}

fn default_per_page_param() -> String {
    "number".to_string()
}

fn default_per_page() -> u64 {
    DEFAULT_PER_PAGE
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            page_param: default_page_param(),
            per_page_param: default_per_page_param(),
            per_page: default_per_page(),
        }
    }
}

impl PaginationOptions {
    /// The 1-based page requested by `query`. Missing or zero means page 1.
    #[must_use]
    pub fn page(&self, query: &Query) -> u64 {
        query
            .get_u64(&self.page_param)
            .filter(|page| *page > 0)
            .unwrap_or(1)
    }

    /// The page size requested by `query`, falling back to the default.
    #[must_use]
    pub fn per_page(&self, query: &Query) -> u64 {
        query
            .get_u64(&self.per_page_param)
            .filter(|n| *n > 0)
            .unwrap_or(self.per_page.max(1))
    }

    /// Index positions covered by the page `query` asks for.
    #[must_use]
    pub fn page_range(&self, query: &Query) -> Range<usize> {
        let per_page = self.per_page(query);
        let start = (self.page(query) - 1).saturating_mul(per_page);
        to_usize(start)..to_usize(start.saturating_add(per_page))
    }

    /// `query` without its pagination parameters, for key generation.
    #[must_use]
    pub fn strip(&self, query: &Query) -> Query {
        query.without(&[self.page_param.as_str(), self.per_page_param.as_str()])
    }

    /// Number of pages needed to hold `found` results at the page size of `query`.
    #[must_use]
    pub fn number_of_pages(&self, query: &Query, found: u64) -> u64 {
        found.div_ceil(self.per_page(query))
    }
}

pub(crate) fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

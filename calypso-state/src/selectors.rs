//! Read accessors over [`ThemesState`].

use crate::state::ThemesState;
use calypso_types::{Entity, ItemKey, Query, ScopeId};

impl ThemesState {
    /// A theme of `site_id`, if it was received.
    #[must_use]
    pub fn get_theme(&self, site_id: &ScopeId, theme_id: &ItemKey) -> Option<&Entity> {
        self.queries.get_item(site_id, theme_id)
    }

    /// Themes on the page `query` asks for. `None` until that page arrived.
    #[must_use]
    pub fn get_themes_for_query(&self, site_id: &ScopeId, query: &Query) -> Option<Vec<&Entity>> {
        self.queries.get_items(site_id, query)
    }

    /// Every theme fetched so far for `query`, across pages.
    #[must_use]
    pub fn get_themes_for_query_ignoring_page(&self, site_id: &ScopeId, query: &Query) -> Option<Vec<&Entity>> {
        self.queries.get(site_id)?.get_items_ignoring_page(query)
    }

    #[must_use]
    pub fn get_themes_found_for_query(&self, site_id: &ScopeId, query: &Query) -> Option<u64> {
        self.queries.get_found(site_id, query)
    }

    /// Number of the last page of `query`, at least 1 once the query is known.
    #[must_use]
    pub fn get_themes_last_page_for_query(&self, site_id: &ScopeId, query: &Query) -> Option<u64> {
        let pages = self.queries.get(site_id)?.get_number_of_pages(query)?;
        Some(pages.max(1))
    }

    /// True when a request for exactly this query (page included) is in flight.
    #[must_use]
    pub fn is_requesting_themes_for_query(&self, site_id: &ScopeId, query: &Query) -> bool {
        let key = self.queries.options().keys.normalize(query, Some(site_id));
        self.query_requests.get(&key).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn is_requesting_theme(&self, site_id: &ScopeId, theme_id: &ItemKey) -> bool {
        self.theme_requests
            .get(site_id)
            .and_then(|themes| themes.get(theme_id))
            .copied()
            .unwrap_or(false)
    }

    #[must_use]
    pub fn get_active_theme(&self, site_id: &ScopeId) -> Option<&ItemKey> {
        self.active_themes.get(site_id)
    }

    #[must_use]
    pub fn is_activating(&self, site_id: &ScopeId) -> bool {
        self.activation_requests.get(site_id).copied().unwrap_or(false)
    }

    /// True between a successful activation and `ThemeClearActivated`.
    #[must_use]
    pub fn has_activated_theme(&self, site_id: &ScopeId) -> bool {
        self.completed_activation_requests.get(site_id).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn is_requesting_active_theme(&self, site_id: &ScopeId) -> bool {
        self.active_theme_requests.get(site_id).copied().unwrap_or(false)
    }

    /// The query of the latest successful theme list request.
    #[must_use]
    pub fn get_last_query(&self, site_id: &ScopeId) -> Option<&Query> {
        self.last_query.get(site_id)
    }
}

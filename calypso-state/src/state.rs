//! The combined themes state.
//!
//! [`ThemesState`] is an immutable value. [`ThemesState::reduce`] builds the
//! next state from the sub-reducers; slices an action doesn't touch are
//! shared with the previous state, and [`ThemesState::ptr_eq`] reports
//! whether anything changed at all.
//!
//! Only `queries` and `activeThemes` persist. Request flags and the last
//! query are session state and start out empty after a reload.

use crate::action::ThemesAction;
use crate::config::ThemesConfig;
use crate::error::Result;
use crate::reducers::{self, ActiveThemes, LastQueries, QueryFlags, SiteFlags, ThemeFlags};
use crate::schema::ACTIVE_THEMES_SCHEMA;
use calypso_query::ManagerRegistry;
use calypso_query::schema::validate_state_with_schema;
use calypso_types::{ItemKey, ScopeId};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Themes state of every site.
#[derive(Debug, Clone)]
pub struct ThemesState {
    pub(crate) queries: ManagerRegistry,
    pub(crate) query_requests: QueryFlags,
    pub(crate) theme_requests: ThemeFlags,
    pub(crate) active_themes: ActiveThemes,
    pub(crate) active_theme_requests: SiteFlags,
    pub(crate) activation_requests: SiteFlags,
    pub(crate) completed_activation_requests: SiteFlags,
    pub(crate) last_query: LastQueries,
    config: Arc<ThemesConfig>,
}

impl Default for ThemesState {
    fn default() -> Self {
        Self::new(ThemesConfig::default())
    }
}

impl ThemesState {
    /// Creates an empty state.
    #[must_use]
    pub fn new(config: ThemesConfig) -> Self {
        Self::with_config(Arc::new(config))
    }

    fn with_config(config: Arc<ThemesConfig>) -> Self {
        Self {
            queries: ManagerRegistry::new(config.manager_options()),
            query_requests: Arc::default(),
            theme_requests: Arc::default(),
            active_themes: Arc::default(),
            active_theme_requests: Arc::default(),
            activation_requests: Arc::default(),
            completed_activation_requests: Arc::default(),
            last_query: Arc::default(),
            config,
        }
    }

    /// Applies `action`.
    ///
    /// On error the state is left as it was; a rejected batch of themes
    /// never partially lands. That includes the request flags: a rejected
    /// `ThemesRequestSuccess` leaves its query marked in flight until the
    /// caller dispatches `ThemesRequestFailure`.
    pub fn reduce(&self, action: &ThemesAction) -> Result<Self> {
        debug!(action = action.kind(), site = ?action.site_id(), "Reducing themes action");

        if matches!(action, ThemesAction::Reset) {
            return Ok(Self::with_config(Arc::clone(&self.config)));
        }

        let options = self.queries.options();
        Ok(Self {
            queries: reducers::queries(&self.queries, action)?,
            active_themes: reducers::active_themes(&self.active_themes, action, &options.item_key)?,
            query_requests: reducers::query_requests(&self.query_requests, action, &options.keys),
            theme_requests: reducers::theme_requests(&self.theme_requests, action),
            active_theme_requests: reducers::active_theme_requests(&self.active_theme_requests, action),
            activation_requests: reducers::activation_requests(&self.activation_requests, action),
            completed_activation_requests: reducers::completed_activation_requests(
                &self.completed_activation_requests,
                action,
            ),
            last_query: reducers::last_query(&self.last_query, action),
            config: Arc::clone(&self.config),
        })
    }

    /// True when no slice differs between the two states.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.queries.ptr_eq(&other.queries)
            && Arc::ptr_eq(&self.query_requests, &other.query_requests)
            && Arc::ptr_eq(&self.theme_requests, &other.theme_requests)
            && Arc::ptr_eq(&self.active_themes, &other.active_themes)
            && Arc::ptr_eq(&self.active_theme_requests, &other.active_theme_requests)
            && Arc::ptr_eq(&self.activation_requests, &other.activation_requests)
            && Arc::ptr_eq(&self.completed_activation_requests, &other.completed_activation_requests)
            && Arc::ptr_eq(&self.last_query, &other.last_query)
    }

    /// Projects the persistent slices: `{ "queries": ..., "activeThemes": ... }`.
    pub fn serialize(&self) -> Result<Value> {
        let queries = self.queries.serialize(self.config.persistence.persist_queries)?;
        let active_themes = serde_json::to_value(&*self.active_themes)?;
        Ok(json!({
            "queries": queries,
            "activeThemes": active_themes,
        }))
    }

    /// Restores a state from [`ThemesState::serialize`] output.
    ///
    /// Each persisted slice is validated on its own. A slice that fails is
    /// logged and starts out empty, the others are still restored.
    #[must_use]
    pub fn deserialize(state: &Value, config: ThemesConfig) -> Self {
        let mut restored = Self::new(config);
        if !state.is_object() {
            if !state.is_null() {
                warn!("Discarding persisted themes state: not an object");
            }
            return restored;
        }

        if let Some(queries) = state.get("queries") {
            restored.queries = ManagerRegistry::deserialize(queries, restored.queries.options().clone());
        }
        if let Some(active_themes) = state.get("activeThemes") {
            restored.active_themes = deserialize_active_themes(active_themes);
        }
        restored
    }

    /// The configuration this state was built with.
    #[must_use]
    pub fn config(&self) -> &ThemesConfig {
        &self.config
    }

    /// Per-site theme stores and query indexes.
    #[must_use]
    pub fn queries(&self) -> &ManagerRegistry {
        &self.queries
    }
}

fn deserialize_active_themes(value: &Value) -> ActiveThemes {
    match try_deserialize_active_themes(value) {
        Ok(map) => Arc::new(map),
        Err(e) => {
            warn!(error = %e, "Discarding persisted active themes");
            Arc::default()
        }
    }
}

fn try_deserialize_active_themes(value: &Value) -> Result<BTreeMap<ScopeId, ItemKey>> {
    validate_state_with_schema(value, &ACTIVE_THEMES_SCHEMA)?;
    Ok(serde_json::from_value(value.clone())?)
}

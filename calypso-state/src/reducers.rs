//! The sub-reducers composing [`ThemesState`](crate::ThemesState).
//!
//! Each takes the current slice and an action and returns the next slice.
//! A slice the action does not touch comes back as the same `Arc`.

use crate::action::ThemesAction;
use crate::error::{Result, StateError};
use calypso_query::{KeyOptions, ManagerRegistry, QueryKey};
use calypso_types::{ItemKey, Query, QueryContext, ScopeId};
use std::collections::BTreeMap;
use std::sync::Arc;

pub(crate) type SiteFlags = Arc<BTreeMap<ScopeId, bool>>;
pub(crate) type ThemeFlags = Arc<BTreeMap<ScopeId, BTreeMap<ItemKey, bool>>>;
pub(crate) type QueryFlags = Arc<BTreeMap<QueryKey, bool>>;
pub(crate) type ActiveThemes = Arc<BTreeMap<ScopeId, ItemKey>>;
pub(crate) type LastQueries = Arc<BTreeMap<ScopeId, Query>>;

/// Inserts `value` under `key`, sharing `map` when the entry already holds it.
pub(crate) fn set_entry<K, V>(map: &Arc<BTreeMap<K, V>>, key: &K, value: V) -> Arc<BTreeMap<K, V>>
where
    K: Ord + Clone,
    V: PartialEq + Clone,
{
    if map.get(key) == Some(&value) {
        return Arc::clone(map);
    }
    let mut next = Arc::clone(map);
    Arc::make_mut(&mut next).insert(key.clone(), value);
    next
}

/// Per-site entity stores and query indexes.
pub(crate) fn queries(registry: &ManagerRegistry, action: &ThemesAction) -> Result<ManagerRegistry> {
    let next = match action {
        ThemesAction::ThemesRequestSuccess {
            site_id,
            query,
            themes,
            found,
        } => {
            let context = QueryContext {
                query: query.clone(),
                found: *found,
            };
            registry.receive(site_id, themes, Some(&context))?
        }
        ThemesAction::ThemesReceive { site_id, themes } => registry.receive(site_id, themes, None)?,
        _ => registry.clone(),
    };
    Ok(next)
}

/// In-flight theme list requests, keyed by the site-scoped query key.
pub(crate) fn query_requests(map: &QueryFlags, action: &ThemesAction, keys: &KeyOptions) -> QueryFlags {
    match action {
        ThemesAction::ThemesRequest { site_id, query } => {
            set_entry(map, &keys.normalize(query, Some(site_id)), true)
        }
        ThemesAction::ThemesRequestSuccess { site_id, query, .. }
        | ThemesAction::ThemesRequestFailure { site_id, query } => {
            set_entry(map, &keys.normalize(query, Some(site_id)), false)
        }
        _ => Arc::clone(map),
    }
}

/// In-flight single theme requests.
pub(crate) fn theme_requests(map: &ThemeFlags, action: &ThemesAction) -> ThemeFlags {
    let (site_id, theme_id, requesting) = match action {
        ThemesAction::ThemeRequest { site_id, theme_id } => (site_id, theme_id, true),
        ThemesAction::ThemeRequestSuccess { site_id, theme_id }
        | ThemesAction::ThemeRequestFailure { site_id, theme_id } => (site_id, theme_id, false),
        _ => return Arc::clone(map),
    };

    let current = map.get(site_id).and_then(|themes| themes.get(theme_id));
    if current == Some(&requesting) {
        return Arc::clone(map);
    }
    let mut next = Arc::clone(map);
    Arc::make_mut(&mut next)
        .entry(site_id.clone())
        .or_default()
        .insert(theme_id.clone(), requesting);
    next
}

/// The active theme of each site.
pub(crate) fn active_themes(map: &ActiveThemes, action: &ThemesAction, item_key: &str) -> Result<ActiveThemes> {
    match action {
        ThemesAction::ThemeActivateRequestSuccess { site_id, theme } => {
            let theme_id = theme.item_key(item_key).ok_or_else(|| StateError::InvalidTheme {
                field: item_key.to_string(),
            })?;
            Ok(set_entry(map, site_id, theme_id))
        }
        ThemesAction::ActiveThemeRequestSuccess { site_id, theme_id } => {
            Ok(set_entry(map, site_id, theme_id.clone()))
        }
        _ => Ok(Arc::clone(map)),
    }
}

/// Whether an activation is in flight.
pub(crate) fn activation_requests(map: &SiteFlags, action: &ThemesAction) -> SiteFlags {
    match action {
        ThemesAction::ThemeActivateRequest { site_id, .. } => set_entry(map, site_id, true),
        ThemesAction::ThemeActivateRequestSuccess { site_id, .. }
        | ThemesAction::ThemeActivateRequestFailure { site_id, .. } => set_entry(map, site_id, false),
        _ => Arc::clone(map),
    }
}

/// Whether an activation finished and hasn't been acknowledged yet.
pub(crate) fn completed_activation_requests(map: &SiteFlags, action: &ThemesAction) -> SiteFlags {
    match action {
        ThemesAction::ThemeActivateRequestSuccess { site_id, .. } => set_entry(map, site_id, true),
        ThemesAction::ThemeClearActivated { site_id } => set_entry(map, site_id, false),
        _ => Arc::clone(map),
    }
}

/// Whether the active theme is being fetched.
pub(crate) fn active_theme_requests(map: &SiteFlags, action: &ThemesAction) -> SiteFlags {
    match action {
        ThemesAction::ActiveThemeRequest { site_id } => set_entry(map, site_id, true),
        ThemesAction::ActiveThemeRequestSuccess { site_id, .. }
        | ThemesAction::ActiveThemeRequestFailure { site_id } => set_entry(map, site_id, false),
        _ => Arc::clone(map),
    }
}

/// The most recent successful query of each site.
pub(crate) fn last_query(map: &LastQueries, action: &ThemesAction) -> LastQueries {
    match action {
        ThemesAction::ThemesRequestSuccess { site_id, query, .. } => set_entry(map, site_id, query.clone()),
        _ => Arc::clone(map),
    }
}

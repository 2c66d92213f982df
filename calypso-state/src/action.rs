//! Actions the themes reducers respond to.
//!
//! The serde form is the one found in recorded action logs:
//! `{"type": "THEMES_REQUEST_SUCCESS", "siteId": 2916284, ...}`.

use calypso_types::{Entity, ItemKey, Query, ScopeId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum ThemesAction {
    ThemeRequest {
        site_id: ScopeId,
        theme_id: ItemKey,
    },
    ThemeRequestSuccess {
        site_id: ScopeId,
        theme_id: ItemKey,
    },
    ThemeRequestFailure {
        site_id: ScopeId,
        theme_id: ItemKey,
    },
    /// Themes received outside of any query, e.g. a single theme fetch.
    ThemesReceive {
        site_id: ScopeId,
        themes: Vec<Entity>,
    },
    ThemesRequest {
        site_id: ScopeId,
        #[serde(default)]
        query: Query,
    },
    ThemesRequestSuccess {
        site_id: ScopeId,
        #[serde(default)]
        query: Query,
        themes: Vec<Entity>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        found: Option<u64>,
    },
    ThemesRequestFailure {
        site_id: ScopeId,
        #[serde(default)]
        query: Query,
    },
    ThemeActivateRequest {
        site_id: ScopeId,
        theme_id: ItemKey,
    },
    ThemeActivateRequestSuccess {
        site_id: ScopeId,
        theme: Entity,
    },
    ThemeActivateRequestFailure {
        site_id: ScopeId,
        theme_id: ItemKey,
    },
    ThemeClearActivated {
        site_id: ScopeId,
    },
    ActiveThemeRequest {
        site_id: ScopeId,
    },
    ActiveThemeRequestSuccess {
        site_id: ScopeId,
        theme_id: ItemKey,
    },
    ActiveThemeRequestFailure {
        site_id: ScopeId,
    },
    /// Drops all state.
    Reset,
}

impl ThemesAction {
    /// Wire name of the action, for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ThemeRequest { .. } => "THEME_REQUEST",
            Self::ThemeRequestSuccess { .. } => "THEME_REQUEST_SUCCESS",
            Self::ThemeRequestFailure { .. } => "THEME_REQUEST_FAILURE",
            Self::ThemesReceive { .. } => "THEMES_RECEIVE",
            Self::ThemesRequest { .. } => "THEMES_REQUEST",
            Self::ThemesRequestSuccess { .. } => "THEMES_REQUEST_SUCCESS",
            Self::ThemesRequestFailure { .. } => "THEMES_REQUEST_FAILURE",
            Self::ThemeActivateRequest { .. } => "THEME_ACTIVATE_REQUEST",
            Self::ThemeActivateRequestSuccess { .. } => "THEME_ACTIVATE_REQUEST_SUCCESS",
            Self::ThemeActivateRequestFailure { .. } => "THEME_ACTIVATE_REQUEST_FAILURE",
            Self::ThemeClearActivated { .. } => "THEME_CLEAR_ACTIVATED",
            Self::ActiveThemeRequest { .. } => "ACTIVE_THEME_REQUEST",
            Self::ActiveThemeRequestSuccess { .. } => "ACTIVE_THEME_REQUEST_SUCCESS",
            Self::ActiveThemeRequestFailure { .. } => "ACTIVE_THEME_REQUEST_FAILURE",
            Self::Reset => "RESET",
        }
    }

    /// Site the action applies to. `None` for [`ThemesAction::Reset`].
    #[must_use]
    pub fn site_id(&self) -> Option<&ScopeId> {
        match self {
            Self::ThemeRequest { site_id, .. }
            | Self::ThemeRequestSuccess { site_id, .. }
            | Self::ThemeRequestFailure { site_id, .. }
            | Self::ThemesReceive { site_id, .. }
            | Self::ThemesRequest { site_id, .. }
            | Self::ThemesRequestSuccess { site_id, .. }
            | Self::ThemesRequestFailure { site_id, .. }
            | Self::ThemeActivateRequest { site_id, .. }
            | Self::ThemeActivateRequestSuccess { site_id, .. }
            | Self::ThemeActivateRequestFailure { site_id, .. }
            | Self::ThemeClearActivated { site_id }
            | Self::ActiveThemeRequest { site_id }
            | Self::ActiveThemeRequestSuccess { site_id, .. }
            | Self::ActiveThemeRequestFailure { site_id } => Some(site_id),
            Self::Reset => None,
        }
    }
}

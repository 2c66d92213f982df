//! TOML configuration of the themes state.
//!
//! Every field is defaulted, so an empty or missing file yields the stock
//! theme setup: items keyed by `id`, pagination enabled with 20 themes per
//! page, and `search`, `tier` and `filter` ignored when empty.
//!
//! ```toml
//! [manager]
//! item-key = "id"
//!
//! [manager.keys]
//! ordered-params = []
//! defaults = { search = "", tier = "", filter = "" }
//!
//! [manager.pagination]
//! enabled = true
//! per-page = 20
//!
//! [persistence]
//! persist-queries = false
//! ```

use crate::error::Result;
use calypso_query::{DEFAULT_PER_PAGE, KeyOptions, ManagerOptions, PaginationOptions};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ThemesConfig {
    #[serde(default)]
    pub manager: ManagerConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

/// `[manager]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ManagerConfig {
    #[serde(default = "default_item_key")]
    pub item_key: String,
    #[serde(default)]
    pub keys: KeysConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
}

/// `[manager.keys]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct KeysConfig {
    #[serde(default)]
    pub ordered_params: Vec<String>,
    #[serde(default = "theme_query_defaults")]
    pub defaults: BTreeMap<String, Value>,
}

/// `[manager.pagination]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PaginationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_page_param")]
    pub page_param: String,
    #[serde(default = "default_per_page_param")]
    pub per_page_param: String,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

/// `[persistence]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PersistenceConfig {
    /// Also persist query indexes, not just entities.
    #[serde(default)]
    pub persist_queries: bool,
}

fn default_item_key() -> String {
    "id".to_string()
}

fn default_true() -> bool {
    true
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

fn theme_query_defaults() -> BTreeMap<String, Value> {
    ["search", "tier", "filter"]
        .into_iter()
        .map(|name| (name.to_string(), Value::String(String::new())))
        .collect()
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            item_key: default_item_key(),
            keys: KeysConfig::default(),
            pagination: PaginationConfig::default(),
        }
    }
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            ordered_params: Vec::new(),
            defaults: theme_query_defaults(),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            page_param: default_page_param(),
            per_page_param: default_per_page_param(),
            per_page: default_per_page(),
        }
    }
}

impl ThemesConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Loads the config at `path`, falling back to defaults.
    ///
    /// A missing file is normal and only logged at info level. A file that
    /// can't be read or parsed is logged as a warning.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No themes config at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!("Loaded themes config from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Failed to parse themes config {:?}: {}. Using defaults.", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read themes config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Options for the per-site theme managers.
    #[must_use]
    pub fn manager_options(&self) -> ManagerOptions {
        let manager = &self.manager;
        let options = ManagerOptions::with_item_key(manager.item_key.clone()).with_keys(KeyOptions {
            ordered_params: manager.keys.ordered_params.clone(),
            defaults: manager.keys.defaults.clone(),
        });

        if manager.pagination.enabled {
            options.paginated(PaginationOptions {
                page_param: manager.pagination.page_param.clone(),
                per_page_param: manager.pagination.per_page_param.clone(),
                per_page: manager.pagination.per_page,
            })
        } else {
            options
        }
    }
}

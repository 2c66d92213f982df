use crate::key::KeyOptions;
use crate::pagination::PaginationOptions;
use serde::{Deserialize, Serialize};

/// Construction options of a [`QueryManager`](crate::QueryManager).
///
/// These are persisted next to the entity data, so a manager can be rebuilt
/// from storage without outside configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerOptions {
    /// Name of the entity field holding the identifier.
    #[serde(default = "default_item_key")]
    pub item_key: String,
    #[serde(default, skip_serializing_if = "is_default_keys")]
    pub keys: KeyOptions,
    /// Page-aware indexing. `None` replaces a query's entry on every receive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationOptions>,
}

fn default_item_key() -> String {
    "id".to_string()
}

fn is_default_keys(keys: &KeyOptions) -> bool {
    *keys == KeyOptions::default()
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            item_key: default_item_key(),
            keys: KeyOptions::default(),
            pagination: None,
        }
    }
}

impl ManagerOptions {
    /// Options keyed on `item_key`, without pagination or query defaults.
    #[must_use]
    pub fn with_item_key(item_key: impl Into<String>) -> Self {
        Self {
            item_key: item_key.into(),
            ..Self::default()
        }
    }

    /// Enables page-aware indexing.
    #[must_use]
    pub fn paginated(mut self, pagination: PaginationOptions) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Replaces the key normalization options.
    #[must_use]
    pub fn with_keys(mut self, keys: KeyOptions) -> Self {
        self.keys = keys;
        self
    }
}

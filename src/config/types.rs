use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::movies::DEFAULT_PAGE_SIZE;
use crate::store::{JsonFileStorage, DEFAULT_CHANGELOG_CAPACITY};

/// Root configuration container. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub persistence: PersistenceConfig,
    pub changelog: ChangelogConfig,
    pub search: SearchConfig,
}

/// Store identity and initial state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store name used in logs and change-log records.
    #[serde(default = "default_store_name")]
    pub name: String,
    /// Seed for `search_by` when nothing is persisted.
    #[serde(default)]
    pub default_query: String,
}

/// Snapshot persistence settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistenceConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Storage key of the persisted envelope.
    #[serde(default = "default_store_name")]
    pub key: String,
    /// Envelope version; snapshots with another version are ignored.
    #[serde(default)]
    pub version: u32,
    /// Storage directory (default: `dirs::data_dir()/moviestore`).
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangelogConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Number of retained transitions (default: 100).
    #[serde(default = "default_changelog_capacity")]
    pub capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Results per catalog page (default: 10).
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_store_name() -> String {
    "movieSearch".to_string()
}

fn default_true() -> bool {
    true
}

fn default_changelog_capacity() -> usize {
    DEFAULT_CHANGELOG_CAPACITY
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl PersistenceConfig {
    /// Directory snapshots are written to.
    pub fn storage_directory(&self) -> PathBuf {
        self.directory
            .clone()
            .unwrap_or_else(JsonFileStorage::default_directory)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: default_store_name(),
            default_query: String::new(),
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            key: default_store_name(),
            version: 0,
            directory: None,
        }
    }
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: default_changelog_capacity(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

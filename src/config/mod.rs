//! Configuration module for moviestore.
//!
//! Handles loading and validating configuration from TOML files.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{ChangelogConfig, Config, PersistenceConfig, SearchConfig, StoreConfig};

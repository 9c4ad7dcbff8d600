use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from `.tick/config.toml`. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub edit: EditConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Key the todo list is stored under
    #[serde(default = "default_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig { key: default_key() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditConfig {
    /// Whether saving an edit may leave a todo with blank text.
    /// Adding a todo always rejects blank text; editing historically did not.
    #[serde(default = "default_true")]
    pub allow_empty: bool,
}

impl Default for EditConfig {
    fn default() -> Self {
        EditConfig { allow_empty: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// chrono format string for creation timestamps
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            timestamp_format: default_timestamp_format(),
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}

pub const DEFAULT_STORAGE_KEY: &str = "todos";

fn default_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_true() -> bool {
    true
}

/// Matches the shape of an en-US locale string, e.g. `1/2/2026, 3:04:05 PM`
fn default_timestamp_format() -> String {
    "%-m/%-d/%Y, %-I:%M:%S %p".to_string()
}

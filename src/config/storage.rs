//! Storage configuration types.

use serde::Deserialize;

/// Path value that selects a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

/// SQLite storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file path, or `:memory:`.
    pub path: String,
    /// Pool size for file-backed databases. In-memory databases always use one
    /// connection so every request sees the same data.
    pub max_connections: u32,
    /// How long a connection waits on SQLite's write lock before failing.
    pub busy_timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "data/storefront.db".to_string(),
            max_connections: 5,
            busy_timeout_secs: 30,
        }
    }
}

impl StorageConfig {
    /// In-memory configuration, used by tests.
    pub fn in_memory() -> Self {
        Self {
            path: IN_MEMORY_PATH.to_string(),
            ..Self::default()
        }
    }

    /// True when the database lives only in memory.
    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY_PATH
    }
}

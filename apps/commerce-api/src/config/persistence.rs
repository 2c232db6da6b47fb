//! Store configuration.

use serde::{Deserialize, Serialize};

/// Accepted values of `persistence.backend`.
pub const BACKENDS: [&str; 2] = ["sqlite", "memory"];

/// Store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// `sqlite` or `memory`.
    #[serde(default = "default_backend")]
    pub backend: String,
    /// SQLite connection URL.
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            database_url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

impl PersistenceConfig {
    /// True when the in-memory store is selected.
    #[must_use]
    pub fn is_memory(&self) -> bool {
        self.backend == "memory"
    }
}

fn default_backend() -> String {
    "sqlite".to_string()
}

fn default_database_url() -> String {
    "sqlite://commerce.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

//! List endpoint limits.

use serde::{Deserialize, Serialize};

/// Pagination configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Largest `limit` honoured; larger values are clamped.
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_limit: default_max_limit(),
        }
    }
}

const fn default_max_limit() -> u32 {
    100
}

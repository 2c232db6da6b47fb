//! HTTP response bodies.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Result type of every handler.
pub type ApiResult<T> = Result<T, ApiError>;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}

impl HealthResponse {
    /// A healthy response for the given version.
    #[must_use]
    pub fn healthy(version: &str) -> Self {
        Self {
            status: "healthy".to_string(),
            version: version.to_string(),
        }
    }
}

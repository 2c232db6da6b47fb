//! API error handling.
//!
//! Every failure that reaches the HTTP boundary becomes an [`ApiError`]: an
//! [`ErrorCode`], a message and key/value context.
//!
//! # Status Codes
//!
//! | Code | HTTP | Usage |
//! |------|------|-------|
//! | `VALIDATION_FAILED` | 400 | Malformed body, query or field |
//! | `INSUFFICIENT_STOCK` | 400 | Order exceeds the stock snapshot |
//! | `NOT_FOUND` | 404 | User, product or order does not exist |
//! | `UNIQUE_CONFLICT` | 409 | Duplicate unique field (email) |
//! | `WRITE_CONFLICT` | 503 | Atomic batch rejected at commit; safe to retry |
//! | `INTERNAL_ERROR` | 500 | Anything unclassified |

use std::collections::BTreeMap;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::use_cases::PlaceOrderError;
use crate::domain::shared::{StoreError, ValidationError};

/// Error codes returned by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Payload, query or field failed validation.
    ValidationFailed,
    /// Requested quantity exceeds available stock.
    InsufficientStock,
    /// Targeted record does not exist.
    NotFound,
    /// Unique field already taken.
    UniqueConflict,
    /// Atomic write rejected by the store.
    WriteConflict,
    /// Internal server error.
    InternalError,
}

impl ErrorCode {
    /// HTTP status for this error.
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::ValidationFailed | Self::InsufficientStock => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::UniqueConflict => StatusCode::CONFLICT,
            Self::WriteConflict => StatusCode::SERVICE_UNAVAILABLE,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Error reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::InsufficientStock => "INSUFFICIENT_STOCK",
            Self::NotFound => "NOT_FOUND",
            Self::UniqueConflict => "UNIQUE_CONFLICT",
            Self::WriteConflict => "WRITE_CONFLICT",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Whether the caller may retry the same request unchanged.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::WriteConflict)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// A rich error with context, rendered as the response body.
#[derive(Debug, Error)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    context: Vec<(String, String)>,
}

impl ApiError {
    /// Create a new API error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: Vec::new(),
        }
    }

    /// Add context to the error.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push((key.into(), value.into()));
        self
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the context.
    #[must_use]
    pub fn context(&self) -> &[(String, String)] {
        &self.context
    }

    /// Convert to the JSON error body.
    #[must_use]
    pub fn to_http_response(&self) -> HttpErrorResponse {
        let mut details: BTreeMap<String, String> = self.context.iter().cloned().collect();
        if self.code.is_retryable() {
            details.insert("retryable".to_string(), "true".to_string());
        }
        HttpErrorResponse {
            code: self.code.reason().to_string(),
            message: self.message.clone(),
            status: self.code.http_status().as_u16(),
            details,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.reason(), self.message)
    }
}

/// HTTP error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpErrorResponse {
    /// Error code string.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// HTTP status code.
    pub status: u16,
    /// Additional details.
    pub details: BTreeMap<String, String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.code == ErrorCode::InternalError {
            tracing::error!(error = %self, "Request failed");
        }
        (self.code.http_status(), Json(self.to_http_response())).into_response()
    }
}

/// Convenience constructors for common errors.
impl ApiError {
    /// Validation failure for a named field.
    #[must_use]
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message).with_context("field", field)
    }

    /// Record not found.
    #[must_use]
    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::new(ErrorCode::NotFound, format!("Cannot find {entity} with id {id}"))
            .with_context("entity", entity)
            .with_context("id", id)
    }

    /// Internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::validation(&err.field, err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => Self::not_found(entity, &id),
            StoreError::UniqueConflict { field } => Self::new(
                ErrorCode::UniqueConflict,
                format!("A record with this {field} already exists"),
            )
            .with_context("field", field),
            StoreError::WriteConflict { reason } => {
                Self::new(ErrorCode::WriteConflict, "The write conflicted with another request")
                    .with_context("reason", reason)
            }
            StoreError::Other(message) => Self::internal(message),
        }
    }
}

impl From<PlaceOrderError> for ApiError {
    fn from(err: PlaceOrderError) -> Self {
        match err {
            PlaceOrderError::InsufficientStock { shortfalls } => {
                let mut api = Self::new(ErrorCode::InsufficientStock, "Insufficient stock");
                for shortfall in shortfalls {
                    let available = shortfall
                        .available
                        .map_or_else(|| "none".to_string(), |a| a.to_string());
                    api = api.with_context(
                        format!("product:{}", shortfall.product_id),
                        format!("requested={} available={available}", shortfall.requested),
                    );
                }
                api
            }
            PlaceOrderError::WriteConflict { reason } => Self::new(
                ErrorCode::WriteConflict,
                "Stock changed while the order was being placed; retry the request",
            )
            .with_context("reason", reason),
            PlaceOrderError::NotFound { entity, id } => Self::not_found(entity, &id),
            PlaceOrderError::Store(store) => store.into(),
        }
    }
}

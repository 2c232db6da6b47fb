// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Commerce API - Rust Core Library
//!
//! REST backend for users, products and orders.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Business types and rules
//!   - `catalog`: Products and categories
//!   - `customer`: Users, preferences, saved products
//!   - `ordering`: Order aggregate, line items, stock verification
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: `OrderStorePort`, the atomic write-batch interface
//!   - `use_cases`: `PlaceOrder`, `ManageUsers`, `ManageProducts`, `ManageOrders`
//!   - `dto`: Request validation and response shapes
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `persistence`: SQLite (sqlx) and in-memory stores
//!   - `http`: axum router and handlers
//!   - `config`: Dependency injection container
//!
//! # Order Placement
//!
//! Stock is checked against a snapshot first, then the order insert and one
//! guarded decrement per product are committed as a single batch. A decrement
//! that finds less stock than it needs aborts the whole batch.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// YAML configuration with environment interpolation.
pub mod config;

/// API error codes and HTTP error rendering.
pub mod error;

/// Tracing subscriber setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use application::use_cases::{PlaceOrderError, PlaceOrderUseCase};
pub use domain::ordering::{NewOrder, Order, StockVerifier};
pub use error::{ApiError, ErrorCode};
pub use infrastructure::config::{CommerceStore, Container};
pub use infrastructure::http::{AppState, create_router};
pub use infrastructure::persistence::{InMemoryStore, SqliteStore};

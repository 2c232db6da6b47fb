//! Shared Domain Types
//!
//! Value objects and errors shared across bounded contexts.

pub mod errors;
pub mod value_objects;

pub use errors::{StoreError, ValidationError};
pub use value_objects::{Money, OrderId, OrderItemId, Page, ProductId, Timestamp, UserId};

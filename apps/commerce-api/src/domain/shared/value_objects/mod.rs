//! Shared Value Objects
//!
//! Immutable domain types used across bounded contexts.

mod identifiers;
mod money;
mod page;
mod timestamp;

pub use identifiers::{OrderId, OrderItemId, ProductId, UserId};
pub use money::Money;
pub use page::Page;
pub use timestamp::Timestamp;

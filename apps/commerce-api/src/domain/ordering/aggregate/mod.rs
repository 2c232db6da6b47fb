//! Order aggregate.

mod order;
mod order_item;

pub use order::{NewOrder, Order};
pub use order_item::OrderItem;

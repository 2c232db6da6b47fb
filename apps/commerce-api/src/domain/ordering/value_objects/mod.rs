//! Ordering value objects.

mod line_item;
mod order_status;
mod stock_level;

pub use line_item::LineItem;
pub use order_status::OrderStatus;
pub use stock_level::StockLevel;

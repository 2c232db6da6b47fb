//! Stock snapshot record.

use crate::domain::shared::{Money, ProductId};

/// Stock and price of one product as read before placing an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockLevel {
    /// Product id.
    pub product_id: ProductId,
    /// Units available at read time.
    pub stock: u32,
    /// List price at read time.
    pub price: Money,
}

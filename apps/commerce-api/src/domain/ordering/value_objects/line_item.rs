//! Requested line item.

use serde::{Deserialize, Serialize};

use crate::domain::shared::{Money, ProductId};

/// A (product, quantity, unit price) tuple requested for an order.
///
/// `quantity` is positive; the payload layer rejects zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product being ordered.
    pub product_id: ProductId,
    /// Units requested.
    pub quantity: u32,
    /// Price per unit at order time.
    pub unit_price: Money,
}

impl LineItem {
    /// Create a line item.
    #[must_use]
    pub const fn new(product_id: ProductId, quantity: u32, unit_price: Money) -> Self {
        Self {
            product_id,
            quantity,
            unit_price,
        }
    }

    /// `unit_price * quantity`, or `None` if it overflows.
    #[must_use]
    pub fn checked_subtotal(&self) -> Option<Money> {
        self.unit_price.checked_times(self.quantity)
    }
}

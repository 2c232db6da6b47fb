//! Persisted order item.

use serde::{Deserialize, Serialize};

use crate::domain::ordering::LineItem;
use crate::domain::shared::{Money, OrderItemId, ProductId};

/// One line of a placed order. Belongs to exactly one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    id: OrderItemId,
    product_id: ProductId,
    quantity: u32,
    unit_price: Money,
}

impl OrderItem {
    /// Create an item from a requested line, with a generated id.
    #[must_use]
    pub fn from_line(line: LineItem) -> Self {
        Self {
            id: OrderItemId::generate(),
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price: line.unit_price,
        }
    }

    /// Rebuild an item from stored columns.
    #[must_use]
    pub const fn reconstitute(
        id: OrderItemId,
        product_id: ProductId,
        quantity: u32,
        unit_price: Money,
    ) -> Self {
        Self {
            id,
            product_id,
            quantity,
            unit_price,
        }
    }

    /// Item id.
    #[must_use]
    pub const fn id(&self) -> &OrderItemId {
        &self.id
    }

    /// Ordered product.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Units ordered.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price per unit captured at order time.
    #[must_use]
    pub const fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// `unit_price * quantity`.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

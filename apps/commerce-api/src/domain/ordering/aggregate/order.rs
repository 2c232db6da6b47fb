//! Order Aggregate Root

use serde::{Deserialize, Serialize};

use super::OrderItem;
use crate::domain::ordering::{LineItem, OrderStatus};
use crate::domain::shared::{Money, OrderId, Timestamp, UserId, ValidationError};

/// An order request that has passed payload validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    user_id: UserId,
    line_items: Vec<LineItem>,
}

impl NewOrder {
    /// Create an order request.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if there are no line items, a quantity is zero,
    /// or the order total does not fit in [`Money`].
    pub fn new(user_id: UserId, line_items: Vec<LineItem>) -> Result<Self, ValidationError> {
        if line_items.is_empty() {
            return Err(ValidationError::new(
                "orderItems",
                "must contain at least one item",
            ));
        }
        if let Some(idx) = line_items.iter().position(|l| l.quantity == 0) {
            return Err(ValidationError::new(
                format!("orderItems[{idx}].quantity"),
                "must be greater than 0",
            ));
        }
        let total = line_items.iter().try_fold(Money::ZERO, |acc, line| {
            line.checked_subtotal().and_then(|sub| acc.checked_add(sub))
        });
        if total.is_none() {
            return Err(ValidationError::new(
                "orderItems",
                "order total exceeds the largest supported amount",
            ));
        }
        Ok(Self {
            user_id,
            line_items,
        })
    }

    /// Ordering user.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Requested lines, in request order.
    #[must_use]
    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }
}

/// Order aggregate root.
///
/// The total is derived from the items on every read and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    status: OrderStatus,
    items: Vec<OrderItem>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Order {
    /// Build the order record for a request. Status starts as `Pending`.
    #[must_use]
    pub fn place(request: NewOrder) -> Self {
        let now = Timestamp::now();
        Self {
            id: OrderId::generate(),
            user_id: request.user_id,
            status: OrderStatus::Pending,
            items: request
                .line_items
                .into_iter()
                .map(OrderItem::from_line)
                .collect(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild an order from stored rows.
    #[must_use]
    pub const fn reconstitute(
        id: OrderId,
        user_id: UserId,
        status: OrderStatus,
        items: Vec<OrderItem>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            user_id,
            status,
            items,
            created_at,
            updated_at,
        }
    }

    /// Set the status. Any status may follow any other.
    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.updated_at = Timestamp::now();
    }

    /// Sum over items of `unit_price * quantity`.
    ///
    /// Placed orders are checked to fit; rows rebuilt from storage saturate
    /// at [`Money::MAX`].
    #[must_use]
    pub fn total(&self) -> Money {
        self.items.iter().map(OrderItem::subtotal).sum()
    }

    /// Order id.
    #[must_use]
    pub const fn id(&self) -> &OrderId {
        &self.id
    }

    /// Ordering user.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        self.status
    }

    /// Items in placement order.
    #[must_use]
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Placement time.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Last update time.
    #[must_use]
    pub const fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}

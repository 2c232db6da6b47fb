//! Order Repository Trait
//!
//! Reads and single-row writes of placed orders. Placement itself goes
//! through the atomic batch port in the application layer.

use async_trait::async_trait;

use super::{Order, OrderStatus};
use crate::domain::shared::{OrderId, Page, StoreError};

/// Repository trait for order persistence.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// List orders, newest first, with their items.
    async fn list_orders(&self, page: Page) -> Result<Vec<Order>, StoreError>;

    /// Find an order by id, with its items.
    async fn find_order(&self, id: &OrderId) -> Result<Option<Order>, StoreError>;

    /// Set the status of an order and return the updated order.
    async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, StoreError>;

    /// Delete an order and its items. Stock is not restored.
    async fn delete_order(&self, id: &OrderId) -> Result<(), StoreError>;
}

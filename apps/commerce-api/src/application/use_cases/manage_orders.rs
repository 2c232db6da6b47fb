//! Manage Orders Use Case
//!
//! Reads, status changes and deletion of placed orders. Placement lives in
//! `PlaceOrderUseCase`.

use std::sync::Arc;

use crate::domain::catalog::{Product, ProductRepository};
use crate::domain::ordering::{Order, OrderRepository, OrderStatus};
use crate::domain::shared::{OrderId, Page, StoreError};

/// Order reads and single-field updates.
pub struct ManageOrdersUseCase<O, P>
where
    O: OrderRepository,
    P: ProductRepository,
{
    orders: Arc<O>,
    products: Arc<P>,
}

impl<O, P> ManageOrdersUseCase<O, P>
where
    O: OrderRepository,
    P: ProductRepository,
{
    /// Create a new ManageOrdersUseCase.
    pub fn new(orders: Arc<O>, products: Arc<P>) -> Self {
        Self { orders, products }
    }

    /// List orders with their items.
    pub async fn list(&self, page: Page) -> Result<Vec<Order>, StoreError> {
        self.orders.list_orders(page).await
    }

    /// Get an order together with the products its items still point at.
    pub async fn get(&self, id: &OrderId) -> Result<(Order, Vec<Product>), StoreError> {
        let order = self
            .orders
            .find_order(id)
            .await?
            .ok_or_else(|| StoreError::not_found("order", id.as_str()))?;

        let mut products: Vec<Product> = Vec::new();
        for item in order.items() {
            if products.iter().any(|p| p.id() == item.product_id()) {
                continue;
            }
            if let Some(product) = self.products.find_product(item.product_id()).await? {
                products.push(product);
            }
        }

        Ok((order, products))
    }

    /// Set the order status.
    pub async fn update_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, StoreError> {
        let order = self.orders.update_order_status(id, status).await?;
        tracing::info!(order_id = %id, status = %status, "Order status updated");
        Ok(order)
    }

    /// Delete an order and its items.
    pub async fn delete(&self, id: &OrderId) -> Result<(), StoreError> {
        self.orders.delete_order(id).await?;
        tracing::info!(order_id = %id, "Order deleted");
        Ok(())
    }
}

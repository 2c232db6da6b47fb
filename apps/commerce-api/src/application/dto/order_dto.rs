//! Order DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{validation, ProductDto};
use crate::domain::catalog::Product;
use crate::domain::ordering::{LineItem, NewOrder, Order, OrderItem, OrderStatus};
use crate::domain::shared::{ProductId, Timestamp, UserId, ValidationError};

/// One requested line of `POST /orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequestDto {
    /// Product to order.
    pub product_id: String,
    /// Greater than zero.
    pub quantity: i64,
    /// Zero or more; kept as the price of record.
    pub unit_price: Decimal,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderDto {
    /// Ordering user.
    pub user_id: String,
    /// Non-empty list of lines.
    pub order_items: Vec<OrderItemRequestDto>,
}

impl CreateOrderDto {
    /// Validate into an order request.
    pub fn into_new_order(self) -> Result<NewOrder, ValidationError> {
        if self.user_id.is_empty() {
            return Err(ValidationError::new("userId", "must not be empty"));
        }
        if self.order_items.is_empty() {
            return Err(ValidationError::new(
                "orderItems",
                "must contain at least one item",
            ));
        }

        let line_items = self
            .order_items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| {
                if item.product_id.is_empty() {
                    return Err(ValidationError::new(
                        format!("orderItems[{idx}].productId"),
                        "must not be empty",
                    ));
                }
                let quantity =
                    validation::positive_count(&format!("orderItems[{idx}].quantity"), item.quantity)?;
                let unit_price =
                    validation::price(&format!("orderItems[{idx}].unitPrice"), item.unit_price)?;
                Ok(LineItem::new(ProductId::new(item.product_id), quantity, unit_price))
            })
            .collect::<Result<Vec<_>, _>>()?;

        NewOrder::new(UserId::new(self.user_id), line_items)
    }
}

/// Body of `PATCH /orders/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusDto {
    /// `PENDING` or `COMPLETE`.
    pub status: String,
}

impl UpdateOrderStatusDto {
    /// Parse the requested status.
    pub fn status(&self) -> Result<OrderStatus, ValidationError> {
        self.status.parse()
    }
}

/// Order item as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDto {
    /// Item id.
    pub id: String,
    /// Ordered product.
    pub product_id: String,
    /// Units ordered.
    pub quantity: u32,
    /// Price per unit at order time.
    pub unit_price: Decimal,
    /// The product record, if it still exists and was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductDto>,
}

impl OrderItemDto {
    fn from_item(item: &OrderItem, product: Option<&Product>) -> Self {
        Self {
            id: item.id().to_string(),
            product_id: item.product_id().to_string(),
            quantity: item.quantity(),
            unit_price: item.unit_price().amount(),
            product: product.map(ProductDto::from),
        }
    }
}

/// Order as returned by the API, with its derived total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    /// Order id.
    pub id: String,
    /// Ordering user.
    pub user_id: String,
    /// Status.
    pub status: OrderStatus,
    /// Items in placement order.
    pub order_items: Vec<OrderItemDto>,
    /// Sum of `unitPrice * quantity` over the items.
    pub total: Decimal,
    /// Created at.
    pub created_at: Timestamp,
    /// Updated at.
    pub updated_at: Timestamp,
}

impl OrderDto {
    /// Create from a domain order, without product records.
    #[must_use]
    pub fn from_order(order: &Order) -> Self {
        Self::with_products(order, &[])
    }

    /// Create from a domain order, attaching each item's product when found
    /// in `products`.
    #[must_use]
    pub fn with_products(order: &Order, products: &[Product]) -> Self {
        Self {
            id: order.id().to_string(),
            user_id: order.user_id().to_string(),
            status: order.status(),
            order_items: order
                .items()
                .iter()
                .map(|item| {
                    let product = products.iter().find(|p| p.id() == item.product_id());
                    OrderItemDto::from_item(item, product)
                })
                .collect(),
            total: order.total().amount(),
            created_at: order.created_at(),
            updated_at: order.updated_at(),
        }
    }
}

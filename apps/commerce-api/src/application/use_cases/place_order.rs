//! Place Order Use Case
//!
//! Checks stock against a snapshot, then submits the order insert and one
//! guarded decrement per distinct product as a single atomic batch.

use std::sync::Arc;

use thiserror::Error;

use crate::application::ports::{OrderStorePort, WriteBatch, WriteOp, WriteResult};
use crate::domain::ordering::{NewOrder, Order, Shortfall, StockVerifier};
use crate::domain::shared::{ProductId, StoreError};

/// Why an order could not be placed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceOrderError {
    /// The snapshot showed too little stock; nothing was written.
    #[error("Insufficient stock for {} product(s)", shortfalls.len())]
    InsufficientStock {
        /// Products that could not cover the request.
        shortfalls: Vec<Shortfall>,
    },

    /// The store rejected the batch at commit time; nothing was written.
    #[error("Order conflicted with a concurrent write: {reason}")]
    WriteConflict {
        /// Store-supplied reason.
        reason: String,
    },

    /// The ordering user does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind.
        entity: &'static str,
        /// Missing id.
        id: String,
    },

    /// Any other store failure.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for PlaceOrderError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::WriteConflict { reason } => Self::WriteConflict { reason },
            StoreError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Store(other),
        }
    }
}

/// Use case for placing an order.
pub struct PlaceOrderUseCase<S>
where
    S: OrderStorePort,
{
    store: Arc<S>,
}

impl<S> PlaceOrderUseCase<S>
where
    S: OrderStorePort,
{
    /// Create a new PlaceOrderUseCase.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Place the order.
    ///
    /// The stock pre-check only fails fast. Two concurrent calls may both
    /// pass it; the store's guarded decrement then lets exactly one commit
    /// and the other fails with `WriteConflict`.
    pub async fn execute(&self, request: NewOrder) -> Result<Order, PlaceOrderError> {
        let requested = StockVerifier::merge_quantities(request.line_items());
        let product_ids: Vec<ProductId> =
            requested.iter().map(|r| r.product_id.clone()).collect();

        let snapshot = self.store.find_stock(&product_ids).await?;

        let shortfalls = StockVerifier::shortfalls(request.line_items(), &snapshot);
        if !shortfalls.is_empty() {
            tracing::warn!(
                user_id = %request.user_id(),
                short_products = shortfalls.len(),
                "Order rejected: insufficient stock"
            );
            return Err(PlaceOrderError::InsufficientStock { shortfalls });
        }

        let order = Order::place(request);
        let order_id = order.id().clone();

        let mut batch = WriteBatch::new();
        batch.push(WriteOp::CreateOrder(order));
        for line in requested {
            batch.push(WriteOp::DecrementStock {
                product_id: line.product_id,
                quantity: line.quantity,
            });
        }

        let results = self.store.execute_batch(batch).await.map_err(|e| {
            match &e {
                StoreError::WriteConflict { reason } => {
                    tracing::warn!(order_id = %order_id, reason = %reason, "Order batch conflicted");
                }
                StoreError::Other(_) => {
                    tracing::error!(order_id = %order_id, error = %e, "Order batch failed");
                }
                _ => {}
            }
            PlaceOrderError::from(e)
        })?;

        let placed = results
            .into_iter()
            .find_map(|result| match result {
                WriteResult::OrderCreated(order) => Some(order),
                WriteResult::StockDecremented { .. } => None,
            })
            .ok_or_else(|| {
                PlaceOrderError::Store(StoreError::Other(
                    "batch committed without returning the order".to_string(),
                ))
            })?;

        tracing::info!(
            order_id = %placed.id(),
            user_id = %placed.user_id(),
            items = placed.items().len(),
            total = %placed.total(),
            "Order placed"
        );

        Ok(placed)
    }
}

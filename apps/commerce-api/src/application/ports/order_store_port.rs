//! Order Store Port (Driven Port)
//!
//! Stock snapshot reads plus an atomic write batch. Every operation in a
//! batch is applied, or none is.

use async_trait::async_trait;

use crate::domain::ordering::{Order, StockLevel};
use crate::domain::shared::{ProductId, StoreError};

/// One write inside an atomic batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    /// Insert an order together with all of its items.
    CreateOrder(Order),
    /// Remove `quantity` units from a product's stock.
    ///
    /// The store must refuse the decrement if it would drive stock below
    /// zero at the moment it is applied, failing the whole batch with
    /// `StoreError::WriteConflict`.
    DecrementStock {
        /// Product to decrement.
        product_id: ProductId,
        /// Units to remove.
        quantity: u64,
    },
}

/// Outcome of one applied write, in batch order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// The order as stored.
    OrderCreated(Order),
    /// Stock after the decrement.
    StockDecremented {
        /// Product decremented.
        product_id: ProductId,
        /// Units left.
        remaining: u32,
    },
}

/// Ordered list of writes submitted as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    /// Create an empty batch.
    #[must_use]
    pub const fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Append a write.
    pub fn push(&mut self, op: WriteOp) {
        self.ops.push(op);
    }

    /// Writes in submission order.
    #[must_use]
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    /// Number of writes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// True if the batch holds no writes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Consume into the list of writes.
    #[must_use]
    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}

/// Store access needed to place an order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderStorePort: Send + Sync {
    /// Current stock and price for the given products.
    ///
    /// Ids with no matching product are left out of the result.
    async fn find_stock(&self, product_ids: &[ProductId]) -> Result<Vec<StockLevel>, StoreError>;

    /// Apply every write of the batch atomically.
    ///
    /// Returns one result per write, in batch order.
    async fn execute_batch(&self, batch: WriteBatch) -> Result<Vec<WriteResult>, StoreError>;
}

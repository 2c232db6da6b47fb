//! Stock Verifier Service
//!
//! Decides whether a set of line items can be fulfilled from a stock
//! snapshot. The check is advisory: the snapshot may already be stale when
//! the order is written, so the store must guard every decrement itself.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::ordering::{LineItem, StockLevel};
use crate::domain::shared::ProductId;

/// Total units requested for one distinct product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedQuantity {
    /// Product id.
    pub product_id: ProductId,
    /// Sum of the quantities of every line naming this product.
    pub quantity: u64,
}

/// A product that cannot cover the requested quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortfall {
    /// Product id.
    pub product_id: ProductId,
    /// Units requested across the order.
    pub requested: u64,
    /// Units in stock, or `None` if the product does not exist.
    pub available: Option<u32>,
}

/// Stateless stock availability check.
pub struct StockVerifier;

impl StockVerifier {
    /// Merge line items by product id, summing quantities.
    ///
    /// The result keeps the order in which each product first appears.
    #[must_use]
    pub fn merge_quantities(line_items: &[LineItem]) -> Vec<RequestedQuantity> {
        let mut merged: Vec<RequestedQuantity> = Vec::with_capacity(line_items.len());
        let mut index: HashMap<&ProductId, usize> = HashMap::with_capacity(line_items.len());

        for line in line_items {
            match index.get(&line.product_id) {
                Some(&i) => merged[i].quantity += u64::from(line.quantity),
                None => {
                    index.insert(&line.product_id, merged.len());
                    merged.push(RequestedQuantity {
                        product_id: line.product_id.clone(),
                        quantity: u64::from(line.quantity),
                    });
                }
            }
        }

        merged
    }

    /// Every product whose snapshot stock is below its merged request.
    ///
    /// A product missing from the snapshot is always a shortfall.
    #[must_use]
    pub fn shortfalls(line_items: &[LineItem], snapshot: &[StockLevel]) -> Vec<Shortfall> {
        let stock: HashMap<&ProductId, u32> = snapshot
            .iter()
            .map(|level| (&level.product_id, level.stock))
            .collect();

        Self::merge_quantities(line_items)
            .into_iter()
            .filter_map(|requested| {
                let available = stock.get(&requested.product_id).copied();
                let enough = available.is_some_and(|s| u64::from(s) >= requested.quantity);
                (!enough).then(|| Shortfall {
                    product_id: requested.product_id,
                    requested: requested.quantity,
                    available,
                })
            })
            .collect()
    }

    /// True only if every referenced product has enough stock.
    #[must_use]
    pub fn check_availability(line_items: &[LineItem], snapshot: &[StockLevel]) -> bool {
        Self::shortfalls(line_items, snapshot).is_empty()
    }
}

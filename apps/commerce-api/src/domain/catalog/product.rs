//! Product aggregate.

use serde::{Deserialize, Serialize};

use super::Category;
use crate::domain::shared::{Money, ProductId, Timestamp};

/// Validated input for creating a product.
#[derive(Debug, Clone)]
pub struct CreateProductCommand {
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Category.
    pub category: Category,
    /// Current list price.
    pub price: Money,
    /// Units available.
    pub stock: u32,
}

/// Validated partial update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New category.
    pub category: Option<Category>,
    /// New price.
    pub price: Option<Money>,
    /// New stock level.
    pub stock: Option<u32>,
}

/// A product in the catalog.
///
/// `stock` is unsigned, so a negative level cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    description: String,
    category: Category,
    price: Money,
    stock: u32,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Product {
    /// Create a new product with a generated id.
    #[must_use]
    pub fn new(cmd: CreateProductCommand) -> Self {
        let now = Timestamp::now();
        Self {
            id: ProductId::generate(),
            name: cmd.name,
            description: cmd.description,
            category: cmd.category,
            price: cmd.price,
            stock: cmd.stock,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a product from stored columns.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub const fn reconstitute(
        id: ProductId,
        name: String,
        description: String,
        category: Category,
        price: Money,
        stock: u32,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            name,
            description,
            category,
            price,
            stock,
            created_at,
            updated_at,
        }
    }

    /// Apply a partial update and bump `updated_at`.
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        self.updated_at = Timestamp::now();
    }

    /// Product id.
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Category.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Current list price.
    #[must_use]
    pub const fn price(&self) -> Money {
        self.price
    }

    /// Units available.
    #[must_use]
    pub const fn stock(&self) -> u32 {
        self.stock
    }

    /// Creation time.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Last update time.
    #[must_use]
    pub const fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Remove `quantity` units, refusing to go below zero.
    ///
    /// Returns the remaining stock, or `None` if there was not enough.
    pub fn take_stock(&mut self, quantity: u32) -> Option<u32> {
        let remaining = self.stock.checked_sub(quantity)?;
        self.stock = remaining;
        self.updated_at = Timestamp::now();
        Some(remaining)
    }
}

//! Product Repository Trait

use async_trait::async_trait;

use super::{Category, Product};
use crate::domain::shared::{Page, ProductId, StoreError};

/// Ordering for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    /// Most recently created first.
    #[default]
    Newest,
    /// Oldest first.
    Oldest,
    /// Cheapest first.
    PriceLowest,
    /// Most expensive first.
    PriceHighest,
}

impl ProductSort {
    /// Parse the `order` query value; unknown values fall back to newest.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("oldest") => Self::Oldest,
            Some("priceLowest") => Self::PriceLowest,
            Some("priceHighest") => Self::PriceHighest,
            _ => Self::Newest,
        }
    }
}

/// Filter, ordering and window for a product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductQuery {
    /// Restrict to one category.
    pub category: Option<Category>,
    /// Ordering.
    pub sort: ProductSort,
    /// Window.
    pub page: Page,
}

/// Repository trait for product persistence.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// List products matching the query.
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, StoreError>;

    /// Find a product by id.
    async fn find_product(&self, id: &ProductId) -> Result<Option<Product>, StoreError>;

    /// Insert a new product.
    async fn insert_product(&self, product: &Product) -> Result<(), StoreError>;

    /// Overwrite an existing product.
    ///
    /// Fails with `StoreError::NotFound` if the product no longer exists.
    async fn update_product(&self, product: &Product) -> Result<(), StoreError>;

    /// Delete a product.
    ///
    /// Fails with `StoreError::NotFound` if the product does not exist.
    async fn delete_product(&self, id: &ProductId) -> Result<(), StoreError>;
}

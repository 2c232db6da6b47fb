//! Manage Products Use Case

use std::sync::Arc;

use crate::domain::catalog::{
    CreateProductCommand, Product, ProductPatch, ProductQuery, ProductRepository,
};
use crate::domain::shared::{ProductId, StoreError};

/// Catalog CRUD.
pub struct ManageProductsUseCase<P>
where
    P: ProductRepository,
{
    products: Arc<P>,
}

impl<P> ManageProductsUseCase<P>
where
    P: ProductRepository,
{
    /// Create a new ManageProductsUseCase.
    pub fn new(products: Arc<P>) -> Self {
        Self { products }
    }

    /// List products.
    pub async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>, StoreError> {
        self.products.list_products(query).await
    }

    /// Get one product.
    pub async fn get(&self, id: &ProductId) -> Result<Product, StoreError> {
        self.products
            .find_product(id)
            .await?
            .ok_or_else(|| StoreError::not_found("product", id.as_str()))
    }

    /// Create a product.
    pub async fn create(&self, cmd: CreateProductCommand) -> Result<Product, StoreError> {
        let product = Product::new(cmd);
        self.products.insert_product(&product).await?;
        tracing::info!(product_id = %product.id(), stock = product.stock(), "Product created");
        Ok(product)
    }

    /// Apply a partial update.
    pub async fn update(&self, id: &ProductId, patch: ProductPatch) -> Result<Product, StoreError> {
        let mut product = self.get(id).await?;
        product.apply(patch);
        self.products.update_product(&product).await?;
        tracing::debug!(product_id = %id, "Product updated");
        Ok(product)
    }

    /// Delete a product.
    pub async fn delete(&self, id: &ProductId) -> Result<(), StoreError> {
        self.products.delete_product(id).await?;
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}

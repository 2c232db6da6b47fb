//! Product DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::validation;
use crate::domain::catalog::{Category, CreateProductCommand, Product, ProductPatch};
use crate::domain::shared::{Timestamp, ValidationError};

/// Body of `POST /products`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductDto {
    /// 1 to 60 characters.
    pub name: String,
    /// Free text.
    pub description: String,
    /// One of the category names.
    pub category: String,
    /// Zero or more.
    pub price: Decimal,
    /// Integer, zero or more.
    pub stock: i64,
}

impl CreateProductDto {
    /// Validate into a domain command.
    pub fn into_command(self) -> Result<CreateProductCommand, ValidationError> {
        validation::length("name", &self.name, 1, 60)?;
        Ok(CreateProductCommand {
            category: self.category.parse::<Category>()?,
            price: validation::price("price", self.price)?,
            stock: validation::non_negative_count("stock", self.stock)?,
            name: self.name,
            description: self.description,
        })
    }
}

/// Body of `PATCH /products/{id}`; any subset of the create fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductDto {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New price.
    pub price: Option<Decimal>,
    /// New stock level.
    pub stock: Option<i64>,
}

impl UpdateProductDto {
    /// Validate the fields that are present.
    pub fn into_patch(self) -> Result<ProductPatch, ValidationError> {
        if let Some(name) = &self.name {
            validation::length("name", name, 1, 60)?;
        }
        Ok(ProductPatch {
            category: self.category.as_deref().map(str::parse).transpose()?,
            price: self
                .price
                .map(|p| validation::price("price", p))
                .transpose()?,
            stock: self
                .stock
                .map(|s| validation::non_negative_count("stock", s))
                .transpose()?,
            name: self.name,
            description: self.description,
        })
    }
}

/// Product as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    /// Product id.
    pub id: String,
    /// Name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Category.
    pub category: Category,
    /// List price.
    pub price: Decimal,
    /// Units in stock.
    pub stock: u32,
    /// Created at.
    pub created_at: Timestamp,
    /// Updated at.
    pub updated_at: Timestamp,
}

impl From<&Product> for ProductDto {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id().to_string(),
            name: product.name().to_string(),
            description: product.description().to_string(),
            category: product.category(),
            price: product.price().amount(),
            stock: product.stock(),
            created_at: product.created_at(),
            updated_at: product.updated_at(),
        }
    }
}

//! Catalog Bounded Context
//!
//! Products offered for sale and their stock levels. Stock is mutated by
//! order placement as well as by explicit product updates.

pub mod category;
pub mod product;
pub mod repository;

pub use category::Category;
pub use product::{CreateProductCommand, Product, ProductPatch};
pub use repository::{ProductQuery, ProductRepository, ProductSort};

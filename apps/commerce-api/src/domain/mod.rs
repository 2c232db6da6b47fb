//! Domain Layer
//!
//! Business types and rules with no HTTP or SQL dependencies.
//!
//! # Bounded Contexts
//!
//! - [`catalog`]: Products, categories, stock levels
//! - [`customer`]: Users, preferences, saved products
//! - [`ordering`]: Orders, line items, stock verification
//!
//! [`shared`] holds identifiers, money, timestamps and the error kinds
//! every repository returns.

pub mod catalog;
pub mod customer;
pub mod ordering;
pub mod shared;

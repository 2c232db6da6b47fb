//! Ordering Bounded Context
//!
//! Orders, their line items and the stock check that gates placement.
//!
//! # Key Concepts
//!
//! - **Order Aggregate**: created together with its items, never partially
//! - **Unit price snapshot**: each item keeps the price it was ordered at
//! - **Stock Verifier**: pure availability check against a stock snapshot

pub mod aggregate;
pub mod repository;
pub mod services;
pub mod value_objects;

pub use aggregate::{NewOrder, Order, OrderItem};
pub use repository::OrderRepository;
pub use services::{RequestedQuantity, Shortfall, StockVerifier};
pub use value_objects::{LineItem, OrderStatus, StockLevel};

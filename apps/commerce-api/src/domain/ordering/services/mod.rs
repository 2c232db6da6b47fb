//! Ordering domain services.

mod stock_verifier;

pub use stock_verifier::{RequestedQuantity, Shortfall, StockVerifier};

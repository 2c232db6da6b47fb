//! Application Ports (Driven)
//!
//! Interfaces the use cases need from the store beyond the plain
//! repository traits of the domain.

mod order_store_port;

#[cfg(test)]
pub use order_store_port::MockOrderStorePort;
pub use order_store_port::{OrderStorePort, WriteBatch, WriteOp, WriteResult};

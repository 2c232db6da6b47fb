//! Persistence Adapters
//!
//! Store implementations of the repository traits and the order store port.

pub mod in_memory;
mod schema;
pub mod sqlite;

pub use in_memory::InMemoryStore;
pub use sqlite::SqliteStore;

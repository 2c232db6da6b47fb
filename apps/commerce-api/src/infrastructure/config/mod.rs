//! Infrastructure configuration and dependency injection.

mod container;

pub use container::{CommerceStore, Container};

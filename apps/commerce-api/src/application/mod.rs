//! Application Layer
//!
//! The application layer orchestrates domain logic through use cases.
//! It defines:
//!
//! - **Ports**: the atomic write-batch interface order placement runs on
//! - **Use Cases**: order placement and the CRUD operations per resource
//! - **DTOs**: request payloads with their validation, and response shapes

pub mod dto;
pub mod ports;
pub mod use_cases;

pub use dto::*;
pub use ports::*;
pub use use_cases::*;

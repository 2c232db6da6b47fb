//! Customer Bounded Context
//!
//! Registered users, their notification preference and saved products.

pub mod repository;
pub mod user;

pub use repository::{UserRepository, UserSort};
pub use user::{CreateUserCommand, User, UserPatch, UserPreference};

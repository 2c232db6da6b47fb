//! Application Use Cases
//!
//! Use cases orchestrate domain logic to fulfill application requirements.

mod manage_orders;
mod manage_products;
mod manage_users;
mod place_order;

pub use manage_orders::ManageOrdersUseCase;
pub use manage_products::ManageProductsUseCase;
pub use manage_users::ManageUsersUseCase;
pub use place_order::{PlaceOrderError, PlaceOrderUseCase};

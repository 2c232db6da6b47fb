//! Dependency Injection Container
//!
//! Holds the store handle and builds use cases around it.

use std::sync::Arc;

use crate::application::ports::OrderStorePort;
use crate::application::use_cases::{
    ManageOrdersUseCase, ManageProductsUseCase, ManageUsersUseCase, PlaceOrderUseCase,
};
use crate::domain::catalog::ProductRepository;
use crate::domain::customer::UserRepository;
use crate::domain::ordering::OrderRepository;

/// A store that backs every use case.
///
/// Implemented automatically for any type that implements all repository
/// traits and the order store port.
pub trait CommerceStore:
    UserRepository + ProductRepository + OrderRepository + OrderStorePort + 'static
{
}

impl<T> CommerceStore for T where
    T: UserRepository + ProductRepository + OrderRepository + OrderStorePort + 'static
{
}

/// Dependency injection container.
///
/// One store instance is shared by all use cases, so every use case sees
/// the same data.
pub struct Container<S>
where
    S: CommerceStore,
{
    store: Arc<S>,
}

impl<S> Container<S>
where
    S: CommerceStore,
{
    /// Create a container around an already-constructed store.
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Get the store.
    pub fn store(&self) -> Arc<S> {
        Arc::clone(&self.store)
    }

    /// Create a `ManageUsersUseCase`.
    pub fn manage_users_use_case(&self) -> ManageUsersUseCase<S> {
        ManageUsersUseCase::new(Arc::clone(&self.store))
    }

    /// Create a `ManageProductsUseCase`.
    pub fn manage_products_use_case(&self) -> ManageProductsUseCase<S> {
        ManageProductsUseCase::new(Arc::clone(&self.store))
    }

    /// Create a `ManageOrdersUseCase`.
    pub fn manage_orders_use_case(&self) -> ManageOrdersUseCase<S, S> {
        ManageOrdersUseCase::new(Arc::clone(&self.store), Arc::clone(&self.store))
    }

    /// Create a `PlaceOrderUseCase`.
    pub fn place_order_use_case(&self) -> PlaceOrderUseCase<S> {
        PlaceOrderUseCase::new(Arc::clone(&self.store))
    }
}

//! User Repository Trait

use async_trait::async_trait;

use super::User;
use crate::domain::catalog::Product;
use crate::domain::shared::{Page, ProductId, StoreError, UserId};

/// Ordering for user listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserSort {
    /// Most recently registered first.
    #[default]
    Newest,
    /// Oldest first.
    Oldest,
}

impl UserSort {
    /// Parse the `order` query value; unknown values fall back to newest.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("oldest") => Self::Oldest,
            _ => Self::Newest,
        }
    }
}

/// Repository trait for user persistence.
///
/// A user and its preference are always written together.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// List users in the requested order.
    async fn list_users(&self, sort: UserSort, page: Page) -> Result<Vec<User>, StoreError>;

    /// Find a user by id.
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, StoreError>;

    /// Insert a new user.
    ///
    /// Fails with `StoreError::UniqueConflict` if the email is taken.
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    /// Overwrite an existing user.
    async fn update_user(&self, user: &User) -> Result<(), StoreError>;

    /// Delete a user together with their preference, saved items and orders.
    async fn delete_user(&self, id: &UserId) -> Result<(), StoreError>;

    /// Link a product to the user's saved items and return all saved items.
    ///
    /// Saving an already saved product is a no-op.
    async fn save_product(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<Vec<Product>, StoreError>;
}

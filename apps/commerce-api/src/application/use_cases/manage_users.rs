//! Manage Users Use Case

use std::sync::Arc;

use crate::domain::catalog::Product;
use crate::domain::customer::{CreateUserCommand, User, UserPatch, UserRepository, UserSort};
use crate::domain::shared::{Page, ProductId, StoreError, UserId};

/// User account CRUD and saved products.
pub struct ManageUsersUseCase<U>
where
    U: UserRepository,
{
    users: Arc<U>,
}

impl<U> ManageUsersUseCase<U>
where
    U: UserRepository,
{
    /// Create a new ManageUsersUseCase.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    /// List users.
    pub async fn list(&self, sort: UserSort, page: Page) -> Result<Vec<User>, StoreError> {
        self.users.list_users(sort, page).await
    }

    /// Get one user.
    pub async fn get(&self, id: &UserId) -> Result<User, StoreError> {
        self.users
            .find_user(id)
            .await?
            .ok_or_else(|| StoreError::not_found("user", id.as_str()))
    }

    /// Register a user together with their optional preference.
    pub async fn create(&self, cmd: CreateUserCommand) -> Result<User, StoreError> {
        let user = User::new(cmd);
        self.users.insert_user(&user).await?;
        tracing::info!(user_id = %user.id(), "User created");
        Ok(user)
    }

    /// Apply a partial update.
    pub async fn update(&self, id: &UserId, patch: UserPatch) -> Result<User, StoreError> {
        let mut user = self.get(id).await?;
        user.apply(patch);
        self.users.update_user(&user).await?;
        tracing::debug!(user_id = %id, "User updated");
        Ok(user)
    }

    /// Delete a user.
    pub async fn delete(&self, id: &UserId) -> Result<(), StoreError> {
        self.users.delete_user(id).await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Save a product for a user; returns the user and all saved products.
    pub async fn save_product(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<(User, Vec<Product>), StoreError> {
        let saved = self.users.save_product(user_id, product_id).await?;
        let user = self.get(user_id).await?;
        tracing::debug!(user_id = %user_id, product_id = %product_id, saved = saved.len(), "Product saved");
        Ok((user, saved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{Category, CreateProductCommand, ProductRepository};
    use crate::domain::customer::UserPreference;
    use crate::domain::shared::Money;
    use crate::infrastructure::persistence::InMemoryStore;
    use rust_decimal_macros::dec;

    fn cmd(email: &str) -> CreateUserCommand {
        CreateUserCommand {
            email: email.to_string(),
            first_name: "Alan".to_string(),
            last_name: "Turing".to_string(),
            address: "Manchester".to_string(),
            preference: Some(UserPreference {
                receive_email: true,
            }),
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_a_unique_conflict() {
        let use_case = ManageUsersUseCase::new(Arc::new(InMemoryStore::new()));
        use_case.create(cmd("alan@example.com")).await.unwrap();

        let err = use_case.create(cmd("alan@example.com")).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::UniqueConflict {
                field: "email".to_string()
            }
        );
    }

    #[tokio::test]
    async fn update_into_taken_email_is_a_unique_conflict() {
        let use_case = ManageUsersUseCase::new(Arc::new(InMemoryStore::new()));
        use_case.create(cmd("alan@example.com")).await.unwrap();
        let other = use_case.create(cmd("joan@example.com")).await.unwrap();

        let err = use_case
            .update(
                other.id(),
                UserPatch {
                    email: Some("alan@example.com".to_string()),
                    ..UserPatch::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueConflict { .. }));
    }

    #[tokio::test]
    async fn save_product_is_idempotent() {
        let store = Arc::new(InMemoryStore::new());
        let use_case = ManageUsersUseCase::new(Arc::clone(&store));
        let user = use_case.create(cmd("alan@example.com")).await.unwrap();
        let product = Product::new(CreateProductCommand {
            name: "Kettle".to_string(),
            description: String::new(),
            category: Category::Kitchenware,
            price: Money::new(dec!(20)),
            stock: 1,
        });
        store.insert_product(&product).await.unwrap();

        use_case.save_product(user.id(), product.id()).await.unwrap();
        let (_, saved) = use_case.save_product(user.id(), product.id()).await.unwrap();

        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].id(), product.id());
    }

    #[tokio::test]
    async fn save_unknown_product_is_not_found() {
        let use_case = ManageUsersUseCase::new(Arc::new(InMemoryStore::new()));
        let user = use_case.create(cmd("alan@example.com")).await.unwrap();

        let err = use_case
            .save_product(user.id(), &ProductId::new("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "product", .. }));
    }
}

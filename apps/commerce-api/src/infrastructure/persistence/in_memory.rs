//! In-memory store for tests and local development.
//!
//! One lock guards every table, so an atomic batch is validated in full and
//! then applied while no other reader or writer can observe it.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::application::ports::{OrderStorePort, WriteBatch, WriteOp, WriteResult};
use crate::domain::catalog::{Product, ProductQuery, ProductRepository, ProductSort};
use crate::domain::customer::{User, UserRepository, UserSort};
use crate::domain::ordering::{Order, OrderRepository, OrderStatus, StockLevel};
use crate::domain::shared::{OrderId, Page, ProductId, StoreError, UserId};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    products: HashMap<ProductId, Product>,
    orders: HashMap<OrderId, Order>,
    saved: HashMap<UserId, Vec<ProductId>>,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<&UserId>) -> bool {
        self.users
            .values()
            .any(|u| u.email() == email && Some(u.id()) != except)
    }
}

/// In-memory implementation of every repository trait and the order store port.
///
/// Suitable for testing and development. Not for production use.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of stored orders.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.read().orders.len()
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, StoreError> {
        let tables = self.read();
        let mut products: Vec<Product> = tables
            .products
            .values()
            .filter(|p| query.category.is_none_or(|c| p.category() == c))
            .cloned()
            .collect();

        match query.sort {
            ProductSort::Newest => {
                products.sort_by_key(|p| (Reverse(p.created_at()), p.id().clone()));
            }
            ProductSort::Oldest => products.sort_by_key(|p| (p.created_at(), p.id().clone())),
            ProductSort::PriceLowest => {
                products.sort_by_key(|p| (p.price(), Reverse(p.created_at())));
            }
            ProductSort::PriceHighest => {
                products.sort_by_key(|p| (Reverse(p.price()), Reverse(p.created_at())));
            }
        }

        Ok(query.page.apply(products))
    }

    async fn find_product(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.read().products.get(id).cloned())
    }

    async fn insert_product(&self, product: &Product) -> Result<(), StoreError> {
        let mut tables = self.write();
        if tables.products.contains_key(product.id()) {
            return Err(StoreError::UniqueConflict {
                field: "id".to_string(),
            });
        }
        tables.products.insert(product.id().clone(), product.clone());
        Ok(())
    }

    async fn update_product(&self, product: &Product) -> Result<(), StoreError> {
        let mut tables = self.write();
        let slot = tables
            .products
            .get_mut(product.id())
            .ok_or_else(|| StoreError::not_found("product", product.id().as_str()))?;
        *slot = product.clone();
        Ok(())
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), StoreError> {
        let mut tables = self.write();
        tables
            .products
            .remove(id)
            .ok_or_else(|| StoreError::not_found("product", id.as_str()))?;
        for saved in tables.saved.values_mut() {
            saved.retain(|p| p != id);
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn list_users(&self, sort: UserSort, page: Page) -> Result<Vec<User>, StoreError> {
        let tables = self.read();
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        match sort {
            UserSort::Newest => users.sort_by_key(|u| (Reverse(u.created_at()), u.id().clone())),
            UserSort::Oldest => users.sort_by_key(|u| (u.created_at(), u.id().clone())),
        }
        Ok(page.apply(users))
    }

    async fn find_user(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        Ok(self.read().users.get(id).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut tables = self.write();
        if tables.email_taken(user.email(), None) {
            return Err(StoreError::UniqueConflict {
                field: "email".to_string(),
            });
        }
        tables.users.insert(user.id().clone(), user.clone());
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<(), StoreError> {
        let mut tables = self.write();
        if !tables.users.contains_key(user.id()) {
            return Err(StoreError::not_found("user", user.id().as_str()));
        }
        if tables.email_taken(user.email(), Some(user.id())) {
            return Err(StoreError::UniqueConflict {
                field: "email".to_string(),
            });
        }
        tables.users.insert(user.id().clone(), user.clone());
        Ok(())
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), StoreError> {
        let mut tables = self.write();
        tables
            .users
            .remove(id)
            .ok_or_else(|| StoreError::not_found("user", id.as_str()))?;
        tables.saved.remove(id);
        tables.orders.retain(|_, order| order.user_id() != id);
        Ok(())
    }

    async fn save_product(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<Vec<Product>, StoreError> {
        let mut tables = self.write();
        if !tables.users.contains_key(user_id) {
            return Err(StoreError::not_found("user", user_id.as_str()));
        }
        if !tables.products.contains_key(product_id) {
            return Err(StoreError::not_found("product", product_id.as_str()));
        }

        let saved = tables.saved.entry(user_id.clone()).or_default();
        if !saved.contains(product_id) {
            saved.push(product_id.clone());
        }

        let ids = saved.clone();
        Ok(ids
            .iter()
            .filter_map(|id| tables.products.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn list_orders(&self, page: Page) -> Result<Vec<Order>, StoreError> {
        let tables = self.read();
        let mut orders: Vec<Order> = tables.orders.values().cloned().collect();
        orders.sort_by_key(|o| (Reverse(o.created_at()), o.id().clone()));
        Ok(page.apply(orders))
    }

    async fn find_order(&self, id: &OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.read().orders.get(id).cloned())
    }

    async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, StoreError> {
        let mut tables = self.write();
        let order = tables
            .orders
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("order", id.as_str()))?;
        order.set_status(status);
        Ok(order.clone())
    }

    async fn delete_order(&self, id: &OrderId) -> Result<(), StoreError> {
        self.write()
            .orders
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("order", id.as_str()))
    }
}

#[async_trait]
impl OrderStorePort for InMemoryStore {
    async fn find_stock(&self, product_ids: &[ProductId]) -> Result<Vec<StockLevel>, StoreError> {
        let tables = self.read();
        Ok(product_ids
            .iter()
            .filter_map(|id| tables.products.get(id))
            .map(|p| StockLevel {
                product_id: p.id().clone(),
                stock: p.stock(),
                price: p.price(),
            })
            .collect())
    }

    async fn execute_batch(&self, batch: WriteBatch) -> Result<Vec<WriteResult>, StoreError> {
        let mut tables = self.write();

        // Validate everything against a scratch copy of the stock levels
        // before touching the tables.
        let mut stock: HashMap<&ProductId, u32> = HashMap::new();
        for op in batch.ops() {
            match op {
                WriteOp::CreateOrder(order) => {
                    if !tables.users.contains_key(order.user_id()) {
                        return Err(StoreError::not_found("user", order.user_id().as_str()));
                    }
                    if tables.orders.contains_key(order.id()) {
                        return Err(StoreError::UniqueConflict {
                            field: "id".to_string(),
                        });
                    }
                }
                WriteOp::DecrementStock {
                    product_id,
                    quantity,
                } => {
                    let current = match stock.get(product_id) {
                        Some(&level) => level,
                        None => tables
                            .products
                            .get(product_id)
                            .map(Product::stock)
                            .ok_or_else(|| {
                                StoreError::write_conflict(format!(
                                    "product {product_id} no longer exists"
                                ))
                            })?,
                    };
                    let remaining = u64::from(current)
                        .checked_sub(*quantity)
                        .and_then(|r| u32::try_from(r).ok())
                        .ok_or_else(|| {
                            StoreError::write_conflict(format!(
                                "stock for product {product_id} is {current}, cannot remove {quantity}"
                            ))
                        })?;
                    stock.insert(product_id, remaining);
                }
            }
        }

        let mut results = Vec::with_capacity(batch.len());
        for op in batch.into_ops() {
            match op {
                WriteOp::CreateOrder(order) => {
                    tables.orders.insert(order.id().clone(), order.clone());
                    results.push(WriteResult::OrderCreated(order));
                }
                WriteOp::DecrementStock {
                    product_id,
                    quantity,
                } => {
                    let product = tables.products.get_mut(&product_id).ok_or_else(|| {
                        StoreError::Other(format!("product {product_id} vanished mid-batch"))
                    })?;
                    let quantity = u32::try_from(quantity).map_err(|_| {
                        StoreError::Other(format!(
                            "decrement of {quantity} for product {product_id} exceeds stock range"
                        ))
                    })?;
                    let remaining = product.take_stock(quantity).ok_or_else(|| {
                        StoreError::Other(format!("product {product_id} stock changed mid-batch"))
                    })?;
                    results.push(WriteResult::StockDecremented {
                        product_id,
                        remaining,
                    });
                }
            }
        }

        tracing::debug!(writes = results.len(), "In-memory batch applied");
        Ok(results)
    }
}

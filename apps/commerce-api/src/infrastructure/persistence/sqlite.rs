//! SQLite store backed by `sqlx`.
//!
//! Prices are stored as decimal TEXT and timestamps as fixed-precision
//! RFC 3339 TEXT. Order placement runs in one transaction whose stock
//! decrements are guarded in SQL, so stock can never go below zero even
//! when two placements passed their pre-check against the same snapshot.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteConnection, SqliteJournalMode, SqlitePool, SqlitePoolOptions,
    SqliteRow,
};
use sqlx::{Row, Sqlite};
use tracing::{debug, info, warn};

use super::schema;
use crate::application::ports::{OrderStorePort, WriteBatch, WriteOp, WriteResult};
use crate::domain::catalog::{Product, ProductQuery, ProductRepository, ProductSort};
use crate::domain::customer::{User, UserPreference, UserRepository, UserSort};
use crate::domain::ordering::{Order, OrderItem, OrderRepository, OrderStatus, StockLevel};
use crate::domain::shared::{
    Money, OrderId, OrderItemId, Page, ProductId, StoreError, Timestamp, UserId,
};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// Error classification
// ============================================================================

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return Self::UniqueConflict {
                    field: unique_field(db.message()),
                };
            }
            if db.code().as_deref().is_some_and(is_busy_code) {
                return Self::write_conflict(format!("database is busy: {}", db.message()));
            }
            if db.is_check_violation() {
                return Self::write_conflict(db.message().to_string());
            }
        }
        Self::Other(err.to_string())
    }
}

/// `UNIQUE constraint failed: users.email` -> `email`.
fn unique_field(message: &str) -> String {
    message
        .rsplit(':')
        .next()
        .and_then(|cols| cols.trim().split(',').next())
        .and_then(|col| col.trim().rsplit('.').next())
        .unwrap_or("unknown")
        .to_string()
}

/// SQLITE_BUSY (5) and SQLITE_LOCKED (6), including extended codes.
fn is_busy_code(code: &str) -> bool {
    code.parse::<i32>().is_ok_and(|c| matches!(c & 0xff, 5 | 6))
}

fn corrupt(column: &str, err: impl std::fmt::Display) -> StoreError {
    StoreError::Other(format!("invalid stored value in '{column}': {err}"))
}

// ============================================================================
// Row decoding
// ============================================================================

fn get<T>(row: &SqliteRow, column: &str) -> Result<T, StoreError>
where
    T: for<'r> sqlx::Decode<'r, Sqlite> + sqlx::Type<Sqlite>,
{
    row.try_get::<T, _>(column).map_err(|e| corrupt(column, e))
}

fn get_decimal(row: &SqliteRow, column: &str) -> Result<Decimal, StoreError> {
    let raw: String = get(row, column)?;
    Decimal::from_str(&raw).map_err(|e| corrupt(column, e))
}

fn get_count(row: &SqliteRow, column: &str) -> Result<u32, StoreError> {
    let raw: i64 = get(row, column)?;
    u32::try_from(raw).map_err(|e| corrupt(column, e))
}

fn get_timestamp(row: &SqliteRow, column: &str) -> Result<Timestamp, StoreError> {
    let raw: String = get(row, column)?;
    Timestamp::parse(&raw).map_err(|e| corrupt(column, e))
}

fn product_from_row(row: &SqliteRow) -> Result<Product, StoreError> {
    let category: String = get(row, "category")?;
    Ok(Product::reconstitute(
        ProductId::new(get::<String>(row, "id")?),
        get(row, "name")?,
        get(row, "description")?,
        category.parse().map_err(|e| corrupt("category", e))?,
        Money::new(get_decimal(row, "price")?),
        get_count(row, "stock")?,
        get_timestamp(row, "created_at")?,
        get_timestamp(row, "updated_at")?,
    ))
}

fn user_from_row(row: &SqliteRow) -> Result<User, StoreError> {
    let receive_email: Option<i64> = get(row, "receive_email")?;
    Ok(User::reconstitute(
        UserId::new(get::<String>(row, "id")?),
        get(row, "email")?,
        get(row, "first_name")?,
        get(row, "last_name")?,
        get(row, "address")?,
        receive_email.map(|flag| UserPreference {
            receive_email: flag != 0,
        }),
        get_timestamp(row, "created_at")?,
        get_timestamp(row, "updated_at")?,
    ))
}

fn item_from_row(row: &SqliteRow) -> Result<OrderItem, StoreError> {
    Ok(OrderItem::reconstitute(
        OrderItemId::new(get::<String>(row, "id")?),
        ProductId::new(get::<String>(row, "product_id")?),
        get_count(row, "quantity")?,
        Money::new(get_decimal(row, "unit_price")?),
    ))
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

const USER_COLUMNS: &str = "u.id, u.email, u.first_name, u.last_name, u.address, \
     u.created_at, u.updated_at, p.receive_email";

const PRODUCT_COLUMNS: &str =
    "id, name, description, category, price, stock, created_at, updated_at";

// ============================================================================
// Store
// ============================================================================

/// SQLite implementation of every repository trait and the order store port.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database and apply the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the database cannot be opened,
    /// or the schema cannot be applied.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.apply_schema().await?;

        info!(
            database_url = database_url,
            max_connections = max_connections,
            "SQLite store initialized"
        );
        Ok(store)
    }

    /// Create any missing tables and indexes.
    ///
    /// # Errors
    ///
    /// Returns an error if a DDL statement fails.
    pub async fn apply_schema(&self) -> Result<(), StoreError> {
        for statement in schema::STATEMENTS {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        debug!(statements = schema::STATEMENTS.len(), "Schema applied");
        Ok(())
    }

    /// Close every pooled connection. Called once on shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("SQLite store closed");
    }

    async fn load_items(
        &self,
        order_ids: &[String],
    ) -> Result<HashMap<String, Vec<OrderItem>>, StoreError> {
        let mut grouped: HashMap<String, Vec<OrderItem>> = HashMap::new();
        if order_ids.is_empty() {
            return Ok(grouped);
        }

        let sql = format!(
            "SELECT id, order_id, product_id, quantity, unit_price FROM order_items \
             WHERE order_id IN ({}) ORDER BY order_id, position",
            placeholders(order_ids.len())
        );
        let mut query = sqlx::query(&sql);
        for id in order_ids {
            query = query.bind(id);
        }

        for row in query.fetch_all(&self.pool).await? {
            let order_id: String = get(&row, "order_id")?;
            grouped.entry(order_id).or_default().push(item_from_row(&row)?);
        }
        Ok(grouped)
    }

    async fn orders_from_rows(&self, rows: Vec<SqliteRow>) -> Result<Vec<Order>, StoreError> {
        let ids = rows
            .iter()
            .map(|row| get::<String>(row, "id"))
            .collect::<Result<Vec<_>, _>>()?;
        let mut items = self.load_items(&ids).await?;

        rows.iter()
            .map(|row| {
                let id: String = get(row, "id")?;
                let status: String = get(row, "status")?;
                Ok(Order::reconstitute(
                    OrderId::new(id.as_str()),
                    UserId::new(get::<String>(row, "user_id")?),
                    status.parse::<OrderStatus>().map_err(|e| corrupt("status", e))?,
                    items.remove(&id).unwrap_or_default(),
                    get_timestamp(row, "created_at")?,
                    get_timestamp(row, "updated_at")?,
                ))
            })
            .collect()
    }
}

async fn insert_order(conn: &mut SqliteConnection, order: &Order) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO orders (id, user_id, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(order.id().as_str())
    .bind(order.user_id().as_str())
    .bind(order.status().as_str())
    .bind(order.created_at().to_rfc3339())
    .bind(order.updated_at().to_rfc3339())
    .execute(&mut *conn)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db) = &e {
            if db.is_foreign_key_violation() {
                return StoreError::not_found("user", order.user_id().as_str());
            }
        }
        StoreError::from(e)
    })?;

    for (position, item) in order.items().iter().enumerate() {
        sqlx::query(
            "INSERT INTO order_items (id, order_id, position, product_id, quantity, unit_price) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(item.id().as_str())
        .bind(order.id().as_str())
        .bind(position as i64)
        .bind(item.product_id().as_str())
        .bind(i64::from(item.quantity()))
        .bind(item.unit_price().amount().to_string())
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Guarded decrement: zero affected rows means the product is gone or
/// has too little stock at this instant.
async fn decrement_stock(
    conn: &mut SqliteConnection,
    product_id: &ProductId,
    quantity: u64,
) -> Result<u32, StoreError> {
    let quantity = i64::try_from(quantity).map_err(|_| {
        StoreError::write_conflict(format!("quantity {quantity} for product {product_id} is out of range"))
    })?;

    let affected = sqlx::query(
        "UPDATE products SET stock = stock - ?, updated_at = ? WHERE id = ? AND stock >= ?",
    )
    .bind(quantity)
    .bind(Timestamp::now().to_rfc3339())
    .bind(product_id.as_str())
    .bind(quantity)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    if affected == 0 {
        return Err(StoreError::write_conflict(format!(
            "product {product_id} no longer has {quantity} in stock"
        )));
    }

    let row = sqlx::query("SELECT stock FROM products WHERE id = ?")
        .bind(product_id.as_str())
        .fetch_one(&mut *conn)
        .await?;
    get_count(&row, "stock")
}

async fn apply_batch(
    conn: &mut SqliteConnection,
    batch: WriteBatch,
) -> Result<Vec<WriteResult>, StoreError> {
    let mut results = Vec::with_capacity(batch.len());
    for op in batch.into_ops() {
        match op {
            WriteOp::CreateOrder(order) => {
                insert_order(conn, &order).await?;
                results.push(WriteResult::OrderCreated(order));
            }
            WriteOp::DecrementStock {
                product_id,
                quantity,
            } => {
                let remaining = decrement_stock(conn, &product_id, quantity).await?;
                results.push(WriteResult::StockDecremented {
                    product_id,
                    remaining,
                });
            }
        }
    }
    Ok(results)
}

#[async_trait]
impl OrderStorePort for SqliteStore {
    async fn find_stock(&self, product_ids: &[ProductId]) -> Result<Vec<StockLevel>, StoreError> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT id, stock, price FROM products WHERE id IN ({})",
            placeholders(product_ids.len())
        );
        let mut query = sqlx::query(&sql);
        for id in product_ids {
            query = query.bind(id.as_str());
        }

        query
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|row| {
                Ok(StockLevel {
                    product_id: ProductId::new(get::<String>(row, "id")?),
                    stock: get_count(row, "stock")?,
                    price: Money::new(get_decimal(row, "price")?),
                })
            })
            .collect()
    }

    async fn execute_batch(&self, batch: WriteBatch) -> Result<Vec<WriteResult>, StoreError> {
        let writes = batch.len();
        let mut tx = self.pool.begin().await?;

        match apply_batch(&mut tx, batch).await {
            Ok(results) => {
                tx.commit().await?;
                debug!(writes = writes, "Batch committed");
                Ok(results)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                debug!(writes = writes, error = %err, "Batch rolled back");
                Err(err)
            }
        }
    }
}

#[async_trait]
impl ProductRepository for SqliteStore {
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, StoreError> {
        let order_by = match query.sort {
            ProductSort::Newest => "created_at DESC, id ASC",
            ProductSort::Oldest => "created_at ASC, id ASC",
            ProductSort::PriceLowest => "CAST(price AS REAL) ASC, created_at DESC",
            ProductSort::PriceHighest => "CAST(price AS REAL) DESC, created_at DESC",
        };
        let filter = if query.category.is_some() {
            "WHERE category = ?"
        } else {
            ""
        };
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products {filter} ORDER BY {order_by} LIMIT ? OFFSET ?"
        );

        let mut q = sqlx::query(&sql);
        if let Some(category) = query.category {
            q = q.bind(category.as_str());
        }
        q.bind(i64::from(query.page.limit))
            .bind(i64::from(query.page.offset))
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(product_from_row)
            .collect()
    }

    async fn find_product(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?
            .as_ref()
            .map(product_from_row)
            .transpose()
    }

    async fn insert_product(&self, product: &Product) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO products (id, name, description, category, price, stock, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(product.id().as_str())
        .bind(product.name())
        .bind(product.description())
        .bind(product.category().as_str())
        .bind(product.price().amount().to_string())
        .bind(i64::from(product.stock()))
        .bind(product.created_at().to_rfc3339())
        .bind(product.updated_at().to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!(product_id = %product.id(), "Product inserted");
        Ok(())
    }

    async fn update_product(&self, product: &Product) -> Result<(), StoreError> {
        let affected = sqlx::query(
            "UPDATE products SET name = ?, description = ?, category = ?, price = ?, stock = ?, \
             updated_at = ? WHERE id = ?",
        )
        .bind(product.name())
        .bind(product.description())
        .bind(product.category().as_str())
        .bind(product.price().amount().to_string())
        .bind(i64::from(product.stock()))
        .bind(product.updated_at().to_rfc3339())
        .bind(product.id().as_str())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(StoreError::not_found("product", product.id().as_str()));
        }
        Ok(())
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), StoreError> {
        let affected = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(StoreError::not_found("product", id.as_str()));
        }
        Ok(())
    }
}

async fn upsert_preference(
    conn: &mut SqliteConnection,
    user_id: &UserId,
    preference: UserPreference,
) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO user_preferences (user_id, receive_email) VALUES (?, ?) \
         ON CONFLICT(user_id) DO UPDATE SET receive_email = excluded.receive_email",
    )
    .bind(user_id.as_str())
    .bind(i64::from(preference.receive_email))
    .execute(&mut *conn)
    .await?;
    Ok(())
}

#[async_trait]
impl UserRepository for SqliteStore {
    async fn list_users(&self, sort: UserSort, page: Page) -> Result<Vec<User>, StoreError> {
        let order_by = match sort {
            UserSort::Newest => "u.created_at DESC, u.id ASC",
            UserSort::Oldest => "u.created_at ASC, u.id ASC",
        };
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users u \
             LEFT JOIN user_preferences p ON p.user_id = u.id \
             ORDER BY {order_by} LIMIT ? OFFSET ?"
        );

        sqlx::query(&sql)
            .bind(i64::from(page.limit))
            .bind(i64::from(page.offset))
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(user_from_row)
            .collect()
    }

    async fn find_user(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users u \
             LEFT JOIN user_preferences p ON p.user_id = u.id WHERE u.id = ?"
        );
        sqlx::query(&sql)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?
            .as_ref()
            .map(user_from_row)
            .transpose()
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO users (id, email, first_name, last_name, address, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id().as_str())
        .bind(user.email())
        .bind(user.first_name())
        .bind(user.last_name())
        .bind(user.address())
        .bind(user.created_at().to_rfc3339())
        .bind(user.updated_at().to_rfc3339())
        .execute(&mut *tx)
        .await?;

        if let Some(preference) = user.preference() {
            upsert_preference(&mut tx, user.id(), preference).await?;
        }

        tx.commit().await?;
        debug!(user_id = %user.id(), "User inserted");
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let affected = sqlx::query(
            "UPDATE users SET email = ?, first_name = ?, last_name = ?, address = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(user.email())
        .bind(user.first_name())
        .bind(user.last_name())
        .bind(user.address())
        .bind(user.updated_at().to_rfc3339())
        .bind(user.id().as_str())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(StoreError::not_found("user", user.id().as_str()));
        }

        if let Some(preference) = user.preference() {
            upsert_preference(&mut tx, user.id(), preference).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), StoreError> {
        let affected = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(StoreError::not_found("user", id.as_str()));
        }
        Ok(())
    }

    async fn save_product(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<Vec<Product>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let user_exists = sqlx::query("SELECT 1 FROM users WHERE id = ?")
            .bind(user_id.as_str())
            .fetch_optional(&mut *tx)
            .await?
            .is_some();
        if !user_exists {
            return Err(StoreError::not_found("user", user_id.as_str()));
        }
        let product_exists = sqlx::query("SELECT 1 FROM products WHERE id = ?")
            .bind(product_id.as_str())
            .fetch_optional(&mut *tx)
            .await?
            .is_some();
        if !product_exists {
            return Err(StoreError::not_found("product", product_id.as_str()));
        }

        sqlx::query("INSERT OR IGNORE INTO saved_products (user_id, product_id) VALUES (?, ?)")
            .bind(user_id.as_str())
            .bind(product_id.as_str())
            .execute(&mut *tx)
            .await?;

        let saved = sqlx::query(
            "SELECT pr.id, pr.name, pr.description, pr.category, pr.price, pr.stock, \
             pr.created_at, pr.updated_at \
             FROM saved_products s JOIN products pr ON pr.id = s.product_id \
             WHERE s.user_id = ? ORDER BY s.rowid",
        )
        .bind(user_id.as_str())
        .fetch_all(&mut *tx)
        .await?
        .iter()
        .map(product_from_row)
        .collect::<Result<Vec<_>, _>>()?;

        tx.commit().await?;
        Ok(saved)
    }
}

#[async_trait]
impl OrderRepository for SqliteStore {
    async fn list_orders(&self, page: Page) -> Result<Vec<Order>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, user_id, status, created_at, updated_at FROM orders \
             ORDER BY created_at DESC, id ASC LIMIT ? OFFSET ?",
        )
        .bind(i64::from(page.limit))
        .bind(i64::from(page.offset))
        .fetch_all(&self.pool)
        .await?;

        self.orders_from_rows(rows).await
    }

    async fn find_order(&self, id: &OrderId) -> Result<Option<Order>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, user_id, status, created_at, updated_at FROM orders WHERE id = ?",
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(self.orders_from_rows(rows).await?.into_iter().next())
    }

    async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, StoreError> {
        let affected = sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(Timestamp::now().to_rfc3339())
            .bind(id.as_str())
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(StoreError::not_found("order", id.as_str()));
        }

        self.find_order(id)
            .await?
            .ok_or_else(|| StoreError::not_found("order", id.as_str()))
    }

    async fn delete_order(&self, id: &OrderId) -> Result<(), StoreError> {
        let affected = sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(StoreError::not_found("order", id.as_str()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{Category, CreateProductCommand};
    use crate::domain::customer::CreateUserCommand;
    use crate::domain::ordering::{LineItem, NewOrder};
    use rust_decimal_macros::dec;

    async fn memory_store() -> SqliteStore {
        SqliteStore::connect("sqlite::memory:", 1).await.unwrap()
    }

    fn product(name: &str, price: Decimal, stock: u32) -> Product {
        Product::new(CreateProductCommand {
            name: name.to_string(),
            description: "test".to_string(),
            category: Category::Electronics,
            price: Money::new(price),
            stock,
        })
    }

    fn user(email: &str) -> User {
        User::new(CreateUserCommand {
            email: email.to_string(),
            first_name: "Kim".to_string(),
            last_name: "Lee".to_string(),
            address: "Busan".to_string(),
            preference: Some(UserPreference {
                receive_email: true,
            }),
        })
    }

    fn order_batch(user: &User, lines: &[(&Product, u32)]) -> (Order, WriteBatch) {
        let order = Order::place(
            NewOrder::new(
                user.id().clone(),
                lines
                    .iter()
                    .map(|(p, q)| LineItem::new(p.id().clone(), *q, p.price()))
                    .collect(),
            )
            .unwrap(),
        );
        let mut batch = WriteBatch::new();
        batch.push(WriteOp::CreateOrder(order.clone()));
        for (p, q) in lines {
            batch.push(WriteOp::DecrementStock {
                product_id: p.id().clone(),
                quantity: u64::from(*q),
            });
        }
        (order, batch)
    }

    #[test]
    fn unique_field_is_taken_from_message() {
        assert_eq!(unique_field("UNIQUE constraint failed: users.email"), "email");
        assert_eq!(unique_field("UNIQUE constraint failed: a.x, a.y"), "x");
    }

    #[test]
    fn busy_and_locked_codes_are_recognized() {
        assert!(is_busy_code("5"));
        assert!(is_busy_code("517"));
        assert!(is_busy_code("6"));
        assert!(!is_busy_code("19"));
        assert!(!is_busy_code("oops"));
    }

    #[tokio::test]
    async fn product_roundtrip_keeps_decimal_price() {
        let store = memory_store().await;
        let p = product("Headphones", dec!(129.99), 4);
        store.insert_product(&p).await.unwrap();

        let loaded = store.find_product(p.id()).await.unwrap().unwrap();
        assert_eq!(loaded, p);
    }

    #[tokio::test]
    async fn user_roundtrip_with_preference() {
        let store = memory_store().await;
        let u = user("kim@example.com");
        store.insert_user(&u).await.unwrap();

        let loaded = store.find_user(u.id()).await.unwrap().unwrap();
        assert_eq!(loaded, u);
    }

    #[tokio::test]
    async fn duplicate_email_maps_to_unique_conflict() {
        let store = memory_store().await;
        store.insert_user(&user("kim@example.com")).await.unwrap();

        let err = store.insert_user(&user("kim@example.com")).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::UniqueConflict {
                field: "email".to_string()
            }
        );
    }

    #[tokio::test]
    async fn batch_commits_order_and_decrements() {
        let store = memory_store().await;
        let u = user("kim@example.com");
        let (a, b) = (product("A", dec!(2.50), 10), product("B", dec!(1), 3));
        store.insert_user(&u).await.unwrap();
        store.insert_product(&a).await.unwrap();
        store.insert_product(&b).await.unwrap();

        let (order, batch) = order_batch(&u, &[(&a, 4), (&b, 3)]);
        let results = store.execute_batch(batch).await.unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(
            results[2],
            WriteResult::StockDecremented {
                product_id: b.id().clone(),
                remaining: 0
            }
        );
        let stored = store.find_order(order.id()).await.unwrap().unwrap();
        assert_eq!(stored, order);
        assert_eq!(stored.total().amount(), dec!(13.00));
    }

    #[tokio::test]
    async fn guarded_decrement_rolls_back_everything() {
        let store = memory_store().await;
        let u = user("kim@example.com");
        let (a, b) = (product("A", dec!(1), 10), product("B", dec!(1), 2));
        store.insert_user(&u).await.unwrap();
        store.insert_product(&a).await.unwrap();
        store.insert_product(&b).await.unwrap();

        let (order, batch) = order_batch(&u, &[(&a, 5), (&b, 3)]);
        let err = store.execute_batch(batch).await.unwrap_err();

        assert!(matches!(err, StoreError::WriteConflict { .. }));
        assert_eq!(store.find_product(a.id()).await.unwrap().unwrap().stock(), 10);
        assert!(store.find_order(order.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_user_maps_to_not_found() {
        let store = memory_store().await;
        let a = product("A", dec!(1), 10);
        store.insert_product(&a).await.unwrap();

        let (_, batch) = order_batch(&user("ghost@example.com"), &[(&a, 1)]);
        let err = store.execute_batch(batch).await.unwrap_err();

        assert!(matches!(err, StoreError::NotFound { entity: "user", .. }));
        assert_eq!(store.find_product(a.id()).await.unwrap().unwrap().stock(), 10);
    }

    #[tokio::test]
    async fn deleting_user_cascades_to_orders() {
        let store = memory_store().await;
        let u = user("kim@example.com");
        let a = product("A", dec!(1), 10);
        store.insert_user(&u).await.unwrap();
        store.insert_product(&a).await.unwrap();
        let (order, batch) = order_batch(&u, &[(&a, 1)]);
        store.execute_batch(batch).await.unwrap();

        store.delete_user(u.id()).await.unwrap();

        assert!(store.find_order(order.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn order_items_survive_product_deletion() {
        let store = memory_store().await;
        let u = user("kim@example.com");
        let a = product("A", dec!(4), 10);
        store.insert_user(&u).await.unwrap();
        store.insert_product(&a).await.unwrap();
        let (order, batch) = order_batch(&u, &[(&a, 2)]);
        store.execute_batch(batch).await.unwrap();

        store.delete_product(a.id()).await.unwrap();

        let stored = store.find_order(order.id()).await.unwrap().unwrap();
        assert_eq!(stored.items().len(), 1);
        assert_eq!(stored.total().amount(), dec!(8));
    }

    #[tokio::test]
    async fn products_sort_by_price() {
        let store = memory_store().await;
        for (name, price) in [("mid", dec!(10.5)), ("high", dec!(100)), ("low", dec!(9.99))] {
            store.insert_product(&product(name, price, 1)).await.unwrap();
        }

        let listed = store
            .list_products(&ProductQuery {
                category: Some(Category::Electronics),
                sort: ProductSort::PriceHighest,
                page: Page::new(0, 10),
            })
            .await
            .unwrap();

        let names: Vec<_> = listed.iter().map(Product::name).collect();
        assert_eq!(names, vec!["high", "mid", "low"]);
    }

    #[tokio::test]
    async fn save_product_is_idempotent_and_checks_both_sides() {
        let store = memory_store().await;
        let u = user("kim@example.com");
        let a = product("A", dec!(1), 1);
        store.insert_user(&u).await.unwrap();
        store.insert_product(&a).await.unwrap();

        store.save_product(u.id(), a.id()).await.unwrap();
        let saved = store.save_product(u.id(), a.id()).await.unwrap();
        assert_eq!(saved.len(), 1);

        let err = store
            .save_product(u.id(), &ProductId::new("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "product", .. }));
    }

    #[tokio::test]
    async fn status_update_and_delete_report_missing_orders() {
        let store = memory_store().await;
        let missing = OrderId::new("missing");

        assert!(matches!(
            store.update_order_status(&missing, OrderStatus::Complete).await,
            Err(StoreError::NotFound { entity: "order", .. })
        ));
        assert!(matches!(
            store.delete_order(&missing).await,
            Err(StoreError::NotFound { entity: "order", .. })
        ));
    }
}

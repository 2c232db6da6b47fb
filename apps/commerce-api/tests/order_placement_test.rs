//! Order Placement Integration Tests
//!
//! Exercises `PlaceOrderUseCase` against both store adapters:
//! - Concurrent placements racing for the same stock
//! - Totals and stock decrements over generated orders
//! - Rejected placements leaving no trace

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use async_trait::async_trait;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::Barrier;

use commerce_api::application::ports::{OrderStorePort, WriteBatch, WriteResult};
use commerce_api::domain::catalog::{Category, CreateProductCommand, Product, ProductRepository};
use commerce_api::domain::customer::{CreateUserCommand, User, UserRepository};
use commerce_api::domain::ordering::{LineItem, NewOrder, OrderRepository, StockLevel};
use commerce_api::domain::shared::{Money, Page, ProductId, StoreError, UserId};
use commerce_api::{CommerceStore, InMemoryStore, PlaceOrderError, PlaceOrderUseCase, SqliteStore};

// =============================================================================
// Fixtures
// =============================================================================

async fn seed_user<S: CommerceStore>(store: &S) -> UserId {
    let user = User::new(CreateUserCommand {
        email: "buyer@example.com".to_string(),
        first_name: "Bea".to_string(),
        last_name: "Buyer".to_string(),
        address: "1 Market Street".to_string(),
        preference: None,
    });
    store.insert_user(&user).await.unwrap();
    user.id().clone()
}

async fn seed_product<S: CommerceStore>(store: &S, price: Decimal, stock: u32) -> ProductId {
    let product = Product::new(CreateProductCommand {
        name: "Widget".to_string(),
        description: "A widget".to_string(),
        category: Category::HouseholdSupplies,
        price: Money::new(price),
        stock,
    });
    store.insert_product(&product).await.unwrap();
    product.id().clone()
}

async fn stock_of<S: CommerceStore>(store: &S, id: &ProductId) -> u32 {
    store.find_product(id).await.unwrap().unwrap().stock()
}

fn order(user: &UserId, lines: &[(&ProductId, u32, Decimal)]) -> NewOrder {
    NewOrder::new(
        user.clone(),
        lines
            .iter()
            .map(|(id, qty, price)| LineItem::new((*id).clone(), *qty, Money::new(*price)))
            .collect(),
    )
    .unwrap()
}

async fn sqlite_file_store() -> (tempfile::TempDir, Arc<SqliteStore>) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("commerce.db").display());
    let store = SqliteStore::connect(&url, 4).await.unwrap();
    (dir, Arc::new(store))
}

/// Holds every `find_stock` caller until all of them have read, so each
/// placement works from the same snapshot.
struct LockstepStore<S> {
    inner: Arc<S>,
    barrier: Barrier,
}

impl<S> LockstepStore<S> {
    fn new(inner: Arc<S>, parties: usize) -> Self {
        Self {
            inner,
            barrier: Barrier::new(parties),
        }
    }
}

#[async_trait]
impl<S: OrderStorePort> OrderStorePort for LockstepStore<S> {
    async fn find_stock(&self, product_ids: &[ProductId]) -> Result<Vec<StockLevel>, StoreError> {
        let levels = self.inner.find_stock(product_ids).await?;
        self.barrier.wait().await;
        Ok(levels)
    }

    async fn execute_batch(&self, batch: WriteBatch) -> Result<Vec<WriteResult>, StoreError> {
        self.inner.execute_batch(batch).await
    }
}

// =============================================================================
// Race for the same stock
// =============================================================================

async fn race_for_stock<S: CommerceStore>(store: Arc<S>) {
    let user = seed_user(store.as_ref()).await;
    let product = seed_product(store.as_ref(), dec!(3.00), 8).await;

    let use_case = PlaceOrderUseCase::new(Arc::new(LockstepStore::new(Arc::clone(&store), 2)));
    let first = order(&user, &[(&product, 5, dec!(3.00))]);
    let second = order(&user, &[(&product, 5, dec!(3.00))]);

    let (a, b) = tokio::join!(use_case.execute(first), use_case.execute(second));

    let results = [a, b];
    let placed = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(PlaceOrderError::WriteConflict { .. })))
        .count();

    assert_eq!(placed, 1, "exactly one placement must win: {results:?}");
    assert_eq!(conflicts, 1, "the loser must see a write conflict: {results:?}");
    assert_eq!(stock_of(store.as_ref(), &product).await, 3);
    assert_eq!(store.list_orders(Page::new(0, 10)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn concurrent_placements_in_memory_never_oversell() {
    race_for_stock(Arc::new(InMemoryStore::new())).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_placements_in_sqlite_never_oversell() {
    let (_dir, store) = sqlite_file_store().await;
    race_for_stock(Arc::clone(&store)).await;
    store.close().await;
}

// =============================================================================
// Single placements
// =============================================================================

#[tokio::test]
async fn placement_decrements_stock_and_totals_items() {
    let (_dir, store) = sqlite_file_store().await;
    let user = seed_user(store.as_ref()).await;
    let product = seed_product(store.as_ref(), dec!(2.50), 10).await;

    let placed = PlaceOrderUseCase::new(Arc::clone(&store))
        .execute(order(&user, &[(&product, 4, dec!(2.50))]))
        .await
        .unwrap();

    assert_eq!(placed.total().amount(), dec!(10.00));
    assert_eq!(stock_of(store.as_ref(), &product).await, 6);

    let stored = store.find_order(placed.id()).await.unwrap().unwrap();
    assert_eq!(stored.items().len(), 1);
    assert_eq!(stored.total().amount(), dec!(10.00));
}

#[tokio::test]
async fn rejected_placement_is_repeatable_and_writes_nothing() {
    let store = Arc::new(InMemoryStore::new());
    let user = seed_user(store.as_ref()).await;
    let product = seed_product(store.as_ref(), dec!(1.00), 2).await;
    let use_case = PlaceOrderUseCase::new(Arc::clone(&store));

    let first = use_case
        .execute(order(&user, &[(&product, 3, dec!(1.00))]))
        .await
        .unwrap_err();
    let second = use_case
        .execute(order(&user, &[(&product, 3, dec!(1.00))]))
        .await
        .unwrap_err();

    assert!(matches!(first, PlaceOrderError::InsufficientStock { .. }));
    assert_eq!(first, second);
    assert_eq!(stock_of(store.as_ref(), &product).await, 2);
    assert_eq!(store.order_count(), 0);
}

#[tokio::test]
async fn duplicate_lines_are_checked_together() {
    let (_dir, store) = sqlite_file_store().await;
    let user = seed_user(store.as_ref()).await;
    let product = seed_product(store.as_ref(), dec!(1.00), 6).await;
    let use_case = PlaceOrderUseCase::new(Arc::clone(&store));

    let err = use_case
        .execute(order(
            &user,
            &[(&product, 3, dec!(1.00)), (&product, 4, dec!(1.00))],
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, PlaceOrderError::InsufficientStock { .. }));
    assert_eq!(stock_of(store.as_ref(), &product).await, 6);

    use_case
        .execute(order(
            &user,
            &[(&product, 3, dec!(1.00)), (&product, 3, dec!(1.00))],
        ))
        .await
        .unwrap();
    assert_eq!(stock_of(store.as_ref(), &product).await, 0);
}

#[tokio::test]
async fn unknown_user_rolls_back_decrements() {
    let (_dir, store) = sqlite_file_store().await;
    let product = seed_product(store.as_ref(), dec!(1.00), 5).await;

    let err = PlaceOrderUseCase::new(Arc::clone(&store))
        .execute(order(&UserId::new("ghost"), &[(&product, 1, dec!(1.00))]))
        .await
        .unwrap_err();

    assert!(matches!(err, PlaceOrderError::NotFound { entity: "user", .. }));
    assert_eq!(stock_of(store.as_ref(), &product).await, 5);
    assert!(store.list_orders(Page::new(0, 10)).await.unwrap().is_empty());
}

// =============================================================================
// Properties
// =============================================================================

/// (stock, quantity, unit price in cents) per product; quantity never exceeds stock.
fn lines_strategy() -> impl Strategy<Value = Vec<(u32, u32, i64)>> {
    prop::collection::vec(
        (1u32..50).prop_flat_map(|stock| (Just(stock), 1..=stock, 0i64..10_000)),
        1..5,
    )
}

proptest! {
    /// Property: a successful placement totals its items and decrements each
    /// product by exactly the quantity ordered.
    #[test]
    fn placement_total_and_decrements_are_exact(lines in lines_strategy()) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let (total, expected_total, remaining) = runtime.block_on(async {
            let store = Arc::new(InMemoryStore::new());
            let user = seed_user(store.as_ref()).await;

            let mut products = Vec::new();
            for (stock, _, cents) in &lines {
                let id = seed_product(store.as_ref(), Decimal::new(*cents, 2), *stock).await;
                products.push(id);
            }

            let items: Vec<LineItem> = lines
                .iter()
                .zip(&products)
                .map(|((_, qty, cents), id)| LineItem::new(id.clone(), *qty, Money::from_cents(*cents)))
                .collect();
            let expected_total: Decimal = lines
                .iter()
                .map(|(_, qty, cents)| Decimal::new(*cents, 2) * Decimal::from(*qty))
                .sum();

            let placed = PlaceOrderUseCase::new(Arc::clone(&store))
                .execute(NewOrder::new(user, items).unwrap())
                .await
                .unwrap();

            let mut remaining = Vec::new();
            for id in &products {
                remaining.push(stock_of(store.as_ref(), id).await);
            }
            (placed.total().amount(), expected_total, remaining)
        });

        prop_assert_eq!(total, expected_total);
        for ((stock, qty, _), left) in lines.iter().zip(remaining) {
            prop_assert_eq!(left, stock - qty);
        }
    }
}

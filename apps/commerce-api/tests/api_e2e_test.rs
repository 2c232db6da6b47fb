//! E2E Integration Tests for the REST API
//!
//! Drives the full stack (HTTP → use cases → SQLite) through the router.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use commerce_api::config::PaginationConfig;
use commerce_api::{AppState, Container, SqliteStore, create_router};

struct TestApp {
    router: Router,
    store: Arc<SqliteStore>,
}

impl TestApp {
    async fn new() -> Self {
        let store = Arc::new(SqliteStore::connect("sqlite::memory:", 1).await.unwrap());
        let container = Container::new(Arc::clone(&store));
        let router = create_router(AppState::from_container(
            &container,
            PaginationConfig { max_limit: 3 },
            "e2e",
        ));
        Self { router, store }
    }

    async fn call(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        if bytes.is_empty() {
            (status, Value::Null)
        } else {
            (status, serde_json::from_slice(&bytes).unwrap())
        }
    }

    async fn user(&self, email: &str) -> String {
        let (status, body) = self
            .call(
                "POST",
                "/users",
                Some(json!({
                    "email": email,
                    "firstName": "Lin",
                    "lastName": "Tester",
                    "address": "7 Test Lane"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_string()
    }

    async fn product(&self, name: &str, category: &str, price: &str, stock: u32) -> String {
        let (status, body) = self
            .call(
                "POST",
                "/products",
                Some(json!({
                    "name": name,
                    "description": "",
                    "category": category,
                    "price": price,
                    "stock": stock
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_string()
    }

    async fn stock(&self, product: &str) -> u64 {
        let (_, body) = self.call("GET", &format!("/products/{product}"), None).await;
        body["stock"].as_u64().unwrap()
    }
}

#[tokio::test]
async fn order_within_stock_succeeds() {
    let app = TestApp::new().await;
    let user = app.user("lin@example.com").await;
    let product = app.product("Tape", "HOUSEHOLD_SUPPLIES", "2.50", 10).await;

    let (status, body) = app
        .call(
            "POST",
            "/orders",
            Some(json!({
                "userId": user,
                "orderItems": [{ "productId": product, "quantity": 4, "unitPrice": "2.50" }]
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["total"], "10.00");
    assert_eq!(body["status"], "PENDING");
    assert_eq!(app.stock(&product).await, 6);
}

#[tokio::test]
async fn order_beyond_stock_is_rejected() {
    let app = TestApp::new().await;
    let user = app.user("lin@example.com").await;
    let product = app.product("Tape", "HOUSEHOLD_SUPPLIES", "2.50", 2).await;

    let (status, body) = app
        .call(
            "POST",
            "/orders",
            Some(json!({
                "userId": user,
                "orderItems": [{ "productId": product, "quantity": 3, "unitPrice": "2.50" }]
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");
    assert_eq!(
        body["details"][format!("product:{product}")],
        "requested=3 available=2"
    );
    assert_eq!(app.stock(&product).await, 2);
}

#[tokio::test]
async fn order_for_unknown_product_is_rejected() {
    let app = TestApp::new().await;
    let user = app.user("lin@example.com").await;

    let (status, body) = app
        .call(
            "POST",
            "/orders",
            Some(json!({
                "userId": user,
                "orderItems": [{ "productId": "nope", "quantity": 1, "unitPrice": "1.00" }]
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["product:nope"], "requested=1 available=none");
}

#[tokio::test]
async fn empty_order_is_validation_failure() {
    let app = TestApp::new().await;
    let user = app.user("lin@example.com").await;

    let (status, body) = app
        .call(
            "POST",
            "/orders",
            Some(json!({ "userId": user, "orderItems": [] })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert_eq!(body["details"]["field"], "orderItems");
}

#[tokio::test]
async fn numeric_unit_price_is_accepted() {
    let app = TestApp::new().await;
    let user = app.user("lin@example.com").await;
    let product = app.product("Tape", "HOUSEHOLD_SUPPLIES", "2.50", 10).await;

    let (status, body) = app
        .call(
            "POST",
            "/orders",
            Some(json!({
                "userId": user,
                "orderItems": [{ "productId": product, "quantity": 4, "unitPrice": 2.5 }]
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    let total: rust_decimal::Decimal = body["total"].as_str().unwrap().parse().unwrap();
    assert_eq!(total, rust_decimal::Decimal::TEN);
    assert_eq!(app.stock(&product).await, 6);
}

#[tokio::test]
async fn order_total_overflow_is_rejected_before_any_write() {
    let app = TestApp::new().await;
    let user = app.user("lin@example.com").await;
    let product = app.product("Tape", "HOUSEHOLD_SUPPLIES", "2.50", 2).await;

    let (status, body) = app
        .call(
            "POST",
            "/orders",
            Some(json!({
                "userId": user,
                "orderItems": [{
                    "productId": product,
                    "quantity": 2,
                    "unitPrice": "50000000000000000000000000000"
                }]
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert_eq!(body["details"]["field"], "orderItems");
    assert_eq!(app.stock(&product).await, 2);

    let (status, orders) = app.call("GET", "/orders", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orders.as_array().map(Vec::len), Some(0), "{orders}");
}

#[tokio::test]
async fn order_survives_product_deletion() {
    let app = TestApp::new().await;
    let user = app.user("lin@example.com").await;
    let product = app.product("Tape", "HOUSEHOLD_SUPPLIES", "2.50", 5).await;

    let (_, order) = app
        .call(
            "POST",
            "/orders",
            Some(json!({
                "userId": user,
                "orderItems": [{ "productId": product, "quantity": 1, "unitPrice": "2.00" }]
            })),
        )
        .await;
    let order_id = order["id"].as_str().unwrap();

    let (status, _) = app.call("DELETE", &format!("/products/{product}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.call("GET", &format!("/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orderItems"][0]["productId"], product.as_str());
    assert!(body["orderItems"][0].get("product").is_none());
    assert_eq!(body["total"], "2.00");
}

#[tokio::test]
async fn deleting_user_removes_their_orders() {
    let app = TestApp::new().await;
    let user = app.user("lin@example.com").await;
    let product = app.product("Tape", "HOUSEHOLD_SUPPLIES", "2.50", 5).await;
    app.call(
        "POST",
        "/orders",
        Some(json!({
            "userId": user,
            "orderItems": [{ "productId": product, "quantity": 1, "unitPrice": "2.50" }]
        })),
    )
    .await;

    let (status, _) = app.call("DELETE", &format!("/users/{user}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, orders) = app.call("GET", "/orders", None).await;
    assert!(orders.as_array().unwrap().is_empty());
    assert_eq!(app.stock(&product).await, 4);
}

#[tokio::test]
async fn product_listing_sorts_by_price_and_clamps_limit() {
    let app = TestApp::new().await;
    app.product("Mid", "SPORTS", "20.00", 1).await;
    app.product("Cheap", "SPORTS", "5.00", 1).await;
    app.product("Dear", "SPORTS", "100.00", 1).await;
    app.product("Other", "BEAUTY", "1.00", 1).await;

    let (_, body) = app
        .call("GET", "/products?category=SPORTS&order=priceLowest", None)
        .await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Cheap", "Mid", "Dear"]);

    let (_, body) = app.call("GET", "/products?order=priceHighest&limit=50", None).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
    assert_eq!(body[0]["name"], "Dear");

    let (_, body) = app.call("GET", "/products?offset=3&order=priceHighest", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Other");
}

#[tokio::test]
async fn user_update_and_preference() {
    let app = TestApp::new().await;
    let user = app.user("lin@example.com").await;
    app.user("taken@example.com").await;

    let (status, body) = app
        .call(
            "PATCH",
            &format!("/users/{user}"),
            Some(json!({ "firstName": "Lynn", "userPreference": { "receiveEmail": false } })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["firstName"], "Lynn");
    assert_eq!(body["userPreference"]["receiveEmail"], false);

    let (status, body) = app
        .call(
            "PATCH",
            &format!("/users/{user}"),
            Some(json!({ "email": "taken@example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["details"]["field"], "email");

    let (status, _) = app
        .call(
            "PATCH",
            &format!("/users/{user}"),
            Some(json!({ "lastName": "" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn saved_items_accumulate_in_save_order() {
    let app = TestApp::new().await;
    let user = app.user("lin@example.com").await;
    let first = app.product("First", "FASHION", "1.00", 1).await;
    let second = app.product("Second", "FASHION", "1.00", 1).await;

    for product in [&first, &second, &first] {
        let (status, _) = app
            .call(
                "POST",
                &format!("/users/{user}/save"),
                Some(json!({ "productId": product })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = app
        .call(
            "POST",
            &format!("/users/{user}/save"),
            Some(json!({ "productId": second })),
        )
        .await;
    let saved: Vec<&str> = body["savedItems"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(saved, ["First", "Second"]);

    app.store.close().await;
}

//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API that delegates to application use cases.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::application::dto::{
    CreateOrderDto, CreateProductDto, CreateUserDto, ListQueryDto, ListWindow, OrderDto,
    ProductDto, SaveProductDto, SavedItemsDto, UpdateOrderStatusDto, UpdateProductDto,
    UpdateUserDto, UserDto,
};
use crate::application::use_cases::{
    ManageOrdersUseCase, ManageProductsUseCase, ManageUsersUseCase, PlaceOrderUseCase,
};
use crate::config::PaginationConfig;
use crate::domain::shared::{OrderId, ProductId, UserId};
use crate::infrastructure::config::{CommerceStore, Container};

use super::request::{ApiJson, ApiQuery};
use super::response::{ApiResult, HealthResponse};

const USERS_DEFAULT_LIMIT: u32 = 5;
const PRODUCTS_DEFAULT_LIMIT: u32 = 10;
const ORDERS_DEFAULT_LIMIT: u32 = 10;

/// Application state shared across handlers.
pub struct AppState<S>
where
    S: CommerceStore,
{
    /// Use case for user records.
    pub users: Arc<ManageUsersUseCase<S>>,
    /// Use case for the catalog.
    pub products: Arc<ManageProductsUseCase<S>>,
    /// Use case for order reads and updates.
    pub orders: Arc<ManageOrdersUseCase<S, S>>,
    /// Use case for placing orders.
    pub place_order: Arc<PlaceOrderUseCase<S>>,
    /// List limits.
    pub pagination: PaginationConfig,
    /// Application version.
    pub version: String,
}

impl<S> AppState<S>
where
    S: CommerceStore,
{
    /// Build the state from a wired container.
    pub fn from_container(
        container: &Container<S>,
        pagination: PaginationConfig,
        version: impl Into<String>,
    ) -> Self {
        Self {
            users: Arc::new(container.manage_users_use_case()),
            products: Arc::new(container.manage_products_use_case()),
            orders: Arc::new(container.manage_orders_use_case()),
            place_order: Arc::new(container.place_order_use_case()),
            pagination,
            version: version.into(),
        }
    }

    const fn window(&self, default_limit: u32) -> ListWindow {
        ListWindow {
            default_limit,
            max_limit: self.pagination.max_limit,
        }
    }
}

impl<S> Clone for AppState<S>
where
    S: CommerceStore,
{
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            products: Arc::clone(&self.products),
            orders: Arc::clone(&self.orders),
            place_order: Arc::clone(&self.place_order),
            pagination: self.pagination,
            version: self.version.clone(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router<S>(state: AppState<S>) -> Router
where
    S: CommerceStore,
{
    Router::new()
        .route("/health", get(health_check::<S>))
        .route("/users", get(list_users::<S>).post(create_user::<S>))
        .route(
            "/users/{id}",
            get(get_user::<S>)
                .patch(update_user::<S>)
                .delete(delete_user::<S>),
        )
        .route("/users/{id}/save", post(save_product::<S>))
        .route("/products", get(list_products::<S>).post(create_product::<S>))
        .route(
            "/products/{id}",
            get(get_product::<S>)
                .patch(update_product::<S>)
                .delete(delete_product::<S>),
        )
        .route("/orders", get(list_orders::<S>).post(place_order::<S>))
        .route(
            "/orders/{id}",
            get(get_order::<S>)
                .patch(update_order_status::<S>)
                .delete(delete_order::<S>),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check<S: CommerceStore>(State(state): State<AppState<S>>) -> impl IntoResponse {
    Json(HealthResponse::healthy(&state.version))
}

// ============================================
// Users
// ============================================

async fn list_users<S: CommerceStore>(
    State(state): State<AppState<S>>,
    ApiQuery(query): ApiQuery<ListQueryDto>,
) -> ApiResult<Json<Vec<UserDto>>> {
    let (sort, page) = query.user_listing(state.window(USERS_DEFAULT_LIMIT))?;
    let users = state.users.list(sort, page).await?;
    Ok(Json(users.iter().map(UserDto::from).collect()))
}

async fn get_user<S: CommerceStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> ApiResult<Json<UserDto>> {
    let user = state.users.get(&UserId::new(id)).await?;
    Ok(Json(UserDto::from(&user)))
}

async fn create_user<S: CommerceStore>(
    State(state): State<AppState<S>>,
    ApiJson(body): ApiJson<CreateUserDto>,
) -> ApiResult<(StatusCode, Json<UserDto>)> {
    let user = state.users.create(body.into_command()?).await?;
    Ok((StatusCode::CREATED, Json(UserDto::from(&user))))
}

async fn update_user<S: CommerceStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateUserDto>,
) -> ApiResult<Json<UserDto>> {
    let user = state
        .users
        .update(&UserId::new(id), body.into_patch()?)
        .await?;
    Ok(Json(UserDto::from(&user)))
}

async fn delete_user<S: CommerceStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.users.delete(&UserId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn save_product<S: CommerceStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<SaveProductDto>,
) -> ApiResult<(StatusCode, Json<SavedItemsDto>)> {
    let product_id = body.product_id()?;
    let (user, saved) = state
        .users
        .save_product(&UserId::new(id), &product_id)
        .await?;
    Ok((StatusCode::CREATED, Json(SavedItemsDto::new(&user, &saved))))
}

// ============================================
// Products
// ============================================

async fn list_products<S: CommerceStore>(
    State(state): State<AppState<S>>,
    ApiQuery(query): ApiQuery<ListQueryDto>,
) -> ApiResult<Json<Vec<ProductDto>>> {
    let query = query.product_query(state.window(PRODUCTS_DEFAULT_LIMIT))?;
    let products = state.products.list(&query).await?;
    Ok(Json(products.iter().map(ProductDto::from).collect()))
}

async fn get_product<S: CommerceStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ProductDto>> {
    let product = state.products.get(&ProductId::new(id)).await?;
    Ok(Json(ProductDto::from(&product)))
}

async fn create_product<S: CommerceStore>(
    State(state): State<AppState<S>>,
    ApiJson(body): ApiJson<CreateProductDto>,
) -> ApiResult<(StatusCode, Json<ProductDto>)> {
    let product = state.products.create(body.into_command()?).await?;
    Ok((StatusCode::CREATED, Json(ProductDto::from(&product))))
}

async fn update_product<S: CommerceStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateProductDto>,
) -> ApiResult<Json<ProductDto>> {
    let product = state
        .products
        .update(&ProductId::new(id), body.into_patch()?)
        .await?;
    Ok(Json(ProductDto::from(&product)))
}

async fn delete_product<S: CommerceStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.products.delete(&ProductId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================
// Orders
// ============================================

async fn list_orders<S: CommerceStore>(
    State(state): State<AppState<S>>,
    ApiQuery(query): ApiQuery<ListQueryDto>,
) -> ApiResult<Json<Vec<OrderDto>>> {
    let page = query.page(state.window(ORDERS_DEFAULT_LIMIT))?;
    let orders = state.orders.list(page).await?;
    Ok(Json(orders.iter().map(OrderDto::from_order).collect()))
}

async fn get_order<S: CommerceStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> ApiResult<Json<OrderDto>> {
    let (order, products) = state.orders.get(&OrderId::new(id)).await?;
    Ok(Json(OrderDto::with_products(&order, &products)))
}

async fn place_order<S: CommerceStore>(
    State(state): State<AppState<S>>,
    ApiJson(body): ApiJson<CreateOrderDto>,
) -> ApiResult<(StatusCode, Json<OrderDto>)> {
    let order = state.place_order.execute(body.into_new_order()?).await?;
    Ok((StatusCode::CREATED, Json(OrderDto::from_order(&order))))
}

async fn update_order_status<S: CommerceStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateOrderStatusDto>,
) -> ApiResult<Json<OrderDto>> {
    let status = body.status()?;
    let order = state
        .orders
        .update_status(&OrderId::new(id), status)
        .await?;
    Ok(Json(OrderDto::from_order(&order)))
}

async fn delete_order<S: CommerceStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.orders.delete(&OrderId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

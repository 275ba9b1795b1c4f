//! 顾客端 HTTP 处理器

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use super::{
    middleware::{CurrentUser, StorefrontState},
    types::{CustomerLoginRequest, PlaceOrderRequest, ProductQuery, RegisterRequest},
};
use crate::common::extract::JsonBody;

/// POST /api/auth/register
pub async fn register(
    State(state): State<StorefrontState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> impl IntoResponse {
    match state.service.register(payload).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => (e.status_code(), Json(e.into_response())).into_response(),
    }
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<StorefrontState>,
    JsonBody(payload): JsonBody<CustomerLoginRequest>,
) -> impl IntoResponse {
    match state.service.login(payload).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => (e.status_code(), Json(e.into_response())).into_response(),
    }
}

/// GET /api/auth/me
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> impl IntoResponse {
    Json(user)
}

/// GET /api/products
pub async fn list_products(
    State(state): State<StorefrontState>,
    Query(query): Query<ProductQuery>,
) -> impl IntoResponse {
    match state.service.list_products(query).await {
        Ok(products) => Json(products).into_response(),
        Err(e) => (e.status_code(), Json(e.into_response())).into_response(),
    }
}

/// GET /api/products/:id
pub async fn get_product(
    State(state): State<StorefrontState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.service.get_product(&id).await {
        Ok(product) => Json(product).into_response(),
        Err(e) => (e.status_code(), Json(e.into_response())).into_response(),
    }
}

/// POST /api/orders
pub async fn place_order(
    State(state): State<StorefrontState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    JsonBody(payload): JsonBody<PlaceOrderRequest>,
) -> impl IntoResponse {
    match state.service.place_order(&user.id, payload).await {
        Ok(order) => (StatusCode::CREATED, Json(order)).into_response(),
        Err(e) => (e.status_code(), Json(e.into_response())).into_response(),
    }
}

/// GET /api/orders/my
pub async fn my_orders(
    State(state): State<StorefrontState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> impl IntoResponse {
    match state.service.my_orders(&user.id).await {
        Ok(orders) => Json(orders).into_response(),
        Err(e) => (e.status_code(), Json(e.into_response())).into_response(),
    }
}

/// GET /api/orders/:id
pub async fn get_my_order(
    State(state): State<StorefrontState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.service.get_my_order(&user.id, &id).await {
        Ok(order) => Json(order).into_response(),
        Err(e) => (e.status_code(), Json(e.into_response())).into_response(),
    }
}

//! Admin API HTTP 处理器

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use super::{
    middleware::AdminState,
    types::{CreateProductRequest, OrderStatusResponse, UpdateOrderStatusRequest, UpdateProductRequest},
};
use crate::common::error::MessageResponse;
use crate::common::extract::JsonBody;
use crate::model::admin::CurrentAdmin;

/// GET /api/admin/stats
/// 获取仪表盘统计
pub async fn get_dashboard_stats(
    State(state): State<AdminState>,
    Extension(admin): Extension<CurrentAdmin>,
) -> impl IntoResponse {
    tracing::debug!(admin_id = %admin.id, "获取仪表盘统计");
    match state.service.dashboard_stats().await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => (e.status_code(), Json(e.into_response())).into_response(),
    }
}

/// GET /api/admin/users
/// 获取所有顾客
pub async fn get_all_users(State(state): State<AdminState>) -> impl IntoResponse {
    match state.service.list_users().await {
        Ok(users) => Json(users).into_response(),
        Err(e) => (e.status_code(), Json(e.into_response())).into_response(),
    }
}

/// GET /api/admin/users/:id
/// 获取顾客详情及其订单
pub async fn get_user(
    State(state): State<AdminState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.service.get_user_detail(&id).await {
        Ok(detail) => Json(detail).into_response(),
        Err(e) => (e.status_code(), Json(e.into_response())).into_response(),
    }
}

/// GET /api/admin/orders
/// 获取所有订单
pub async fn get_all_orders(State(state): State<AdminState>) -> impl IntoResponse {
    match state.service.list_orders().await {
        Ok(orders) => Json(orders).into_response(),
        Err(e) => (e.status_code(), Json(e.into_response())).into_response(),
    }
}

/// GET /api/admin/orders/:id
/// 获取订单详情
pub async fn get_order(
    State(state): State<AdminState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.service.get_order(&id).await {
        Ok(order) => Json(order).into_response(),
        Err(e) => (e.status_code(), Json(e.into_response())).into_response(),
    }
}

/// PATCH /api/admin/orders/:id/status
/// 更新订单状态和/或支付状态
pub async fn update_order_status(
    State(state): State<AdminState>,
    Extension(admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateOrderStatusRequest>,
) -> impl IntoResponse {
    match state.service.update_order_status(&id, payload).await {
        Ok(order) => {
            tracing::debug!(admin_id = %admin.id, order_id = %id, "管理员更新订单状态");
            Json(OrderStatusResponse {
                message: "Order status updated successfully".to_string(),
                order,
            })
            .into_response()
        }
        Err(e) => (e.status_code(), Json(e.into_response())).into_response(),
    }
}

/// POST /api/admin/products
/// 创建商品
pub async fn create_product(
    State(state): State<AdminState>,
    JsonBody(payload): JsonBody<CreateProductRequest>,
) -> impl IntoResponse {
    match state.service.create_product(payload).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => (e.status_code(), Json(e.into_response())).into_response(),
    }
}

/// PUT /api/admin/products/:id
/// 更新商品
pub async fn update_product(
    State(state): State<AdminState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateProductRequest>,
) -> impl IntoResponse {
    match state.service.update_product(&id, payload).await {
        Ok(product) => Json(product).into_response(),
        Err(e) => (e.status_code(), Json(e.into_response())).into_response(),
    }
}

/// DELETE /api/admin/products/:id
/// 删除商品
pub async fn delete_product(
    State(state): State<AdminState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.service.delete_product(&id).await {
        Ok(_) => Json(MessageResponse::new("Product deleted successfully")).into_response(),
        Err(e) => (e.status_code(), Json(e.into_response())).into_response(),
    }
}

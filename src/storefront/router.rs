//! 顾客端路由配置

use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::{
    handlers::{
        get_my_order, get_product, list_products, login, me, my_orders, place_order, register,
    },
    middleware::{StorefrontState, customer_auth_middleware},
};

/// 创建顾客端路由（挂载在 `/api` 下）
///
/// # 端点
/// - `POST /auth/register` - 注册
/// - `POST /auth/login` - 登录
/// - `GET /auth/me` - 当前顾客信息
/// - `GET /products` - 商品列表（支持 `category`、`search`）
/// - `GET /products/:id` - 商品详情
/// - `POST /orders` - 下单
/// - `GET /orders/my` - 我的订单
/// - `GET /orders/:id` - 我的订单详情
pub fn create_storefront_router(state: StorefrontState) -> Router {
    let protected = Router::new()
        .route("/auth/me", get(me))
        .route("/orders", post(place_order))
        .route("/orders/my", get(my_orders))
        .route("/orders/{id}", get(get_my_order))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            customer_auth_middleware,
        ));

    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
        .merge(protected)
        .with_state(state)
}

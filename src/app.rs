//! 应用组装：路由、跨域、静态文件和请求追踪

use anyhow::Context;
use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::admin::{self, AdminService, AdminState};
use crate::common::error::MessageResponse;
use crate::db::Database;
use crate::jwt::JwtManager;
use crate::model::config::Config;
use crate::storefront::{self, StorefrontService, StorefrontState};

/// 构建完整的应用路由
///
/// - `GET /` 健康检查
/// - `/api/admin` 管理端
/// - `/api/auth`、`/api/products`、`/api/orders` 顾客端
/// - `/uploads` 上传的商品图片
pub fn build_app(config: &Config, db: Database) -> anyhow::Result<Router> {
    let secret = config.jwt_secret().context("未配置 JWT_SECRET")?;
    let jwt = JwtManager::new(secret, config.token_ttl_secs);

    let admin_service = AdminService::new(db.clone(), jwt.clone(), config.bcrypt_cost);
    let admin_router = admin::create_admin_router(AdminState::new(jwt.clone(), admin_service));

    let storefront_service = StorefrontService::new(db, jwt.clone(), config.bcrypt_cost);
    let storefront_router =
        storefront::create_storefront_router(StorefrontState::new(jwt, storefront_service));

    Ok(Router::new()
        .route("/", get(health))
        .nest("/api/admin", admin_router)
        .nest("/api", storefront_router)
        .nest_service("/uploads", ServeDir::new(&config.uploads_dir))
        .layer(cors_layer(&config.cors_origins)?)
        .layer(TraceLayer::new_for_http()))
}

async fn health() -> Json<MessageResponse> {
    Json(MessageResponse::new("Dress Shop API is running"))
}

/// CORS 中间件层
///
/// 只对列表中的来源返回跨域响应头（允许携带凭据）；
/// 其他来源的请求照常处理，只是不带 CORS 头，由浏览器拦截。
pub fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            let origin = origin.trim().trim_end_matches('/');
            HeaderValue::from_str(origin).with_context(|| format!("无效的 CORS 来源: {}", origin))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true))
}

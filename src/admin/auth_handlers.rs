//! Admin 认证相关处理器
//!
//! 提供登录和免认证的状态检查端点

use axum::{
    Json,
    extract::State,
    response::IntoResponse,
};

use super::{middleware::AdminState, types::LoginRequest};
use crate::common::error::MessageResponse;
use crate::common::extract::JsonBody;

/// POST /api/admin/login
///
/// 校验邮箱和密码，返回 JWT Token 和管理员信息
pub async fn login(
    State(state): State<AdminState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> impl IntoResponse {
    match state.service.login(payload).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => (e.status_code(), Json(e.into_response())).into_response(),
    }
}

/// GET /api/admin/test
///
/// 管理路由可用性检查（不需要认证）
pub async fn admin_status() -> impl IntoResponse {
    Json(MessageResponse::new("Admin routes working"))
}

//! Admin API 中间件
//!
//! 认证流程：Authorization header → 提取 Token → 验证签名和有效期 → 查找管理员。
//! 任一步失败都会在进入业务处理器之前返回错误响应。

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use super::service::AdminService;
use crate::common::auth::{BearerError, extract_bearer_token};
use crate::common::error::ErrorResponse;
use crate::db::StoreError;
use crate::jwt::{AdminClaims, JwtManager};
use crate::model::admin::CurrentAdmin;

/// Admin API 共享状态
#[derive(Clone)]
pub struct AdminState {
    /// JWT 管理器
    pub jwt: JwtManager,
    /// Admin 服务
    pub service: Arc<AdminService>,
}

impl AdminState {
    pub fn new(jwt: JwtManager, service: AdminService) -> Self {
        Self {
            jwt,
            service: Arc::new(service),
        }
    }
}

/// 认证失败原因
#[derive(Debug, Error)]
pub enum AdminAuthError {
    #[error("No authorization header")]
    MissingHeader,

    #[error("No token provided")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    /// Token 有效但管理员记录不存在
    #[error("Admin not found")]
    AdminNotFound,

    #[error("{0}")]
    Store(#[from] StoreError),
}

impl AdminAuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingHeader | Self::MissingToken | Self::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            Self::AdminNotFound => StatusCode::FORBIDDEN,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            Self::MissingHeader | Self::MissingToken | Self::InvalidToken => {
                "authentication_error"
            }
            Self::AdminNotFound => "permission_error",
            Self::Store(_) => "internal_error",
        }
    }
}

impl From<BearerError> for AdminAuthError {
    fn from(e: BearerError) -> Self {
        match e {
            BearerError::MissingHeader => Self::MissingHeader,
            BearerError::MissingToken => Self::MissingToken,
            BearerError::Malformed => Self::InvalidToken,
        }
    }
}

impl IntoResponse for AdminAuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = ErrorResponse::new(self.error_type(), self.to_string());
        (status, Json(error)).into_response()
    }
}

/// 校验请求头中的管理员 Token（不访问存储）
pub fn verify_bearer(jwt: &JwtManager, headers: &HeaderMap) -> Result<AdminClaims, AdminAuthError> {
    let token = extract_bearer_token(headers)?;
    jwt.verify_admin_token(token).map_err(|e| {
        tracing::debug!(reason = ?e.kind(), "管理员 Token 验证失败");
        AdminAuthError::InvalidToken
    })
}

/// 完整认证：校验 Token 并解析出管理员身份
pub async fn authenticate(
    state: &AdminState,
    headers: &HeaderMap,
) -> Result<CurrentAdmin, AdminAuthError> {
    let claims = verify_bearer(&state.jwt, headers)?;
    let admin = state
        .service
        .find_admin(&claims.admin_id)
        .await?
        .ok_or(AdminAuthError::AdminNotFound)?;
    Ok(CurrentAdmin::from(admin))
}

/// Admin API 认证中间件
///
/// 认证成功后将 [`CurrentAdmin`] 注入请求扩展
pub async fn admin_auth_middleware(
    State(state): State<AdminState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let result = authenticate(&state, request.headers()).await;
    match result {
        Ok(admin) => {
            request.extensions_mut().insert(admin);
            next.run(request).await
        }
        Err(e) => {
            match &e {
                AdminAuthError::Store(err) => tracing::error!("管理员认证查询失败: {}", err),
                other => tracing::debug!(path = %request.uri().path(), "管理员认证失败: {}", other),
            }
            e.into_response()
        }
    }
}

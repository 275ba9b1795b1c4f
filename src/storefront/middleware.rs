//! 顾客端认证中间件
//!
//! 与管理端相同的流程，但使用顾客 Token；Token 对应的顾客不存在时返回 401。

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use super::service::StorefrontService;
use crate::common::auth::{BearerError, extract_bearer_token};
use crate::common::error::ErrorResponse;
use crate::db::StoreError;
use crate::jwt::JwtManager;
use crate::model::user::User;

/// 顾客端共享状态
#[derive(Clone)]
pub struct StorefrontState {
    pub jwt: JwtManager,
    pub service: Arc<StorefrontService>,
}

impl StorefrontState {
    pub fn new(jwt: JwtManager, service: StorefrontService) -> Self {
        Self {
            jwt,
            service: Arc::new(service),
        }
    }
}

/// 已通过认证的顾客，由认证中间件注入请求扩展
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[derive(Debug, Error)]
pub enum CustomerAuthError {
    #[error("No authorization header")]
    MissingHeader,

    #[error("No token provided")]
    MissingToken,

    /// 签名无效、已过期或顾客已不存在
    #[error("Invalid token")]
    InvalidToken,

    #[error("{0}")]
    Store(#[from] StoreError),
}

impl CustomerAuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl From<BearerError> for CustomerAuthError {
    fn from(e: BearerError) -> Self {
        match e {
            BearerError::MissingHeader => Self::MissingHeader,
            BearerError::MissingToken => Self::MissingToken,
            BearerError::Malformed => Self::InvalidToken,
        }
    }
}

impl IntoResponse for CustomerAuthError {
    fn into_response(self) -> Response {
        let error_type = match self {
            Self::Store(_) => "internal_error",
            _ => "authentication_error",
        };
        let status = self.status_code();
        (status, Json(ErrorResponse::new(error_type, self.to_string()))).into_response()
    }
}

pub async fn authenticate(
    state: &StorefrontState,
    headers: &HeaderMap,
) -> Result<User, CustomerAuthError> {
    let token = extract_bearer_token(headers)?;
    let claims = state.jwt.verify_user_token(token).map_err(|e| {
        tracing::debug!(reason = ?e.kind(), "顾客 Token 验证失败");
        CustomerAuthError::InvalidToken
    })?;
    state
        .service
        .find_user(&claims.user_id)
        .await?
        .ok_or(CustomerAuthError::InvalidToken)
}

/// 顾客认证中间件
pub async fn customer_auth_middleware(
    State(state): State<StorefrontState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let result = authenticate(&state, request.headers()).await;
    match result {
        Ok(user) => {
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        Err(e) => {
            if let CustomerAuthError::Store(err) = &e {
                tracing::error!("顾客认证查询失败: {}", err);
            }
            e.into_response()
        }
    }
}

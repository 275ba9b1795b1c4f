//! 业务错误与 HTTP 映射

use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;

use crate::db::StoreError;

/// 业务层错误
///
/// 每个变体对应一个 HTTP 状态码，由处理器在本地转换为 JSON 响应。
#[derive(Debug, Error)]
pub enum ServiceError {
    /// 请求参数或凭据错误
    #[error("{0}")]
    BadRequest(String),

    /// 实体不存在
    #[error("{0}")]
    NotFound(String),

    /// 存储或运行时异常
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// 获取对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 转换为 JSON 错误响应体
    pub fn into_response(self) -> ErrorResponse {
        match self {
            Self::BadRequest(msg) => ErrorResponse::new("invalid_request", msg),
            Self::NotFound(msg) => ErrorResponse::new("not_found", msg),
            Self::Internal(msg) => ErrorResponse::new("internal_error", msg),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        tracing::error!("存储操作失败: {}", e);
        Self::Internal(e.to_string())
    }
}

/// 错误响应体 `{ "message": ..., "type": ... }`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: String,
}

impl ErrorResponse {
    pub fn new(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_type: error_type.into(),
        }
    }
}

/// 操作成功响应
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ServiceError::bad_request("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_message_is_passed_through() {
        let body = serde_json::to_value(ServiceError::Internal("disk full".into()).into_response())
            .unwrap();
        assert_eq!(body["message"], "disk full");
        assert_eq!(body["type"], "internal_error");
    }
}

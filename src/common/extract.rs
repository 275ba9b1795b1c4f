//! 请求体提取
//!
//! 包装 axum 的 `Json` 提取器，使缺少 Content-Type、JSON 语法错误和字段类型不匹配
//! 都返回与业务错误相同的 `{ message, type }` 响应体。

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    response::{IntoResponse, Response},
};

use super::error::ServiceError;

/// JSON 请求体
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(status = %rejection.status(), "请求体解析失败: {}", rejection.body_text());
                let e = ServiceError::bad_request(rejection.body_text());
                Err((e.status_code(), Json(e.into_response())).into_response())
            }
        }
    }
}

//! Bearer Token 提取

use axum::http::{HeaderMap, header::AUTHORIZATION};

/// Bearer 前缀
const BEARER_PREFIX: &str = "Bearer ";

/// 从 Authorization header 提取 Token 失败的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BearerError {
    /// 没有 Authorization header，或 header 值为空
    MissingHeader,
    /// 去掉前缀后 Token 为空
    MissingToken,
    /// header 不是合法的可见 ASCII
    Malformed,
}

/// 从请求头中提取 Bearer Token
///
/// 没有 `Bearer ` 前缀时整个 header 值被当作 Token，交由后续签名校验拒绝。
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, BearerError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(BearerError::MissingHeader)?
        .to_str()
        .map_err(|_| BearerError::Malformed)?;
    if value.trim().is_empty() {
        return Err(BearerError::MissingHeader);
    }

    let token = value.strip_prefix(BEARER_PREFIX).unwrap_or(value).trim();
    if token.is_empty() {
        return Err(BearerError::MissingToken);
    }
    Ok(token)
}

//! 密码哈希
//!
//! bcrypt 计算量较大，放在阻塞线程池中执行

use super::error::ServiceError;

pub async fn hash_password(password: &str, cost: u32) -> Result<String, ServiceError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| ServiceError::Internal(e.to_string()))?
        .map_err(|e| ServiceError::Internal(format!("密码哈希失败: {}", e)))
}

/// 校验密码；哈希格式损坏时视为不匹配
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, ServiceError> {
    let password = password.to_string();
    let hash = hash.to_string();
    let matched = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| ServiceError::Internal(e.to_string()))?;

    match matched {
        Ok(matched) => Ok(matched),
        Err(e) => {
            tracing::warn!("密码哈希格式无效: {}", e);
            Ok(false)
        }
    }
}

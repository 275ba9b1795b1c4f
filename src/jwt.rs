//! JWT Token 管理模块
//!
//! 提供管理员和顾客两类 Token 的签发与验证。两类 Claims 的必填字段不同，
//! 管理员 Token 无法作为顾客 Token 通过验证，反之亦然。

use anyhow::Result;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// JWT Token 默认有效期（7 天）
pub const TOKEN_EXPIRY_SECONDS: u64 = 7 * 24 * 60 * 60;

/// 管理员 Token Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminClaims {
    /// 管理员 ID
    pub admin_id: String,
    /// 签发时间 (Unix timestamp)
    pub iat: u64,
    /// 过期时间 (Unix timestamp)
    pub exp: u64,
}

/// 顾客 Token Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserClaims {
    /// 顾客 ID
    pub user_id: String,
    pub iat: u64,
    pub exp: u64,
}

/// Token 验证失败（格式错误、签名不匹配或已过期）
#[derive(Debug, Error)]
#[error("invalid token: {0}")]
pub struct InvalidToken(#[from] jsonwebtoken::errors::Error);

impl InvalidToken {
    /// 失败原因，仅用于日志
    pub fn kind(&self) -> &jsonwebtoken::errors::ErrorKind {
        self.0.kind()
    }
}

/// 从配置的密钥派生 HMAC 密钥
///
/// 使用 SHA256 哈希密钥作为 JWT 签名密钥
fn derive_secret_key(secret: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.finalize().to_vec()
}

fn now_secs() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

/// JWT 管理器
#[derive(Clone)]
pub struct JwtManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
}

impl JwtManager {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        let key = derive_secret_key(secret);
        Self {
            encoding: EncodingKey::from_secret(&key),
            decoding: DecodingKey::from_secret(&key),
            ttl_secs,
        }
    }

    /// 签发管理员 Token
    pub fn issue_admin_token(&self, admin_id: &str) -> Result<String> {
        self.issue_admin_token_at(admin_id, now_secs())
    }

    /// 以指定签发时间签发管理员 Token
    pub fn issue_admin_token_at(&self, admin_id: &str, issued_at: u64) -> Result<String> {
        let claims = AdminClaims {
            admin_id: admin_id.to_string(),
            iat: issued_at,
            exp: issued_at + self.ttl_secs,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// 验证管理员 Token
    pub fn verify_admin_token(&self, token: &str) -> Result<AdminClaims, InvalidToken> {
        self.verify(token)
    }

    /// 签发顾客 Token
    pub fn issue_user_token(&self, user_id: &str) -> Result<String> {
        self.issue_user_token_at(user_id, now_secs())
    }

    pub fn issue_user_token_at(&self, user_id: &str, issued_at: u64) -> Result<String> {
        let claims = UserClaims {
            user_id: user_id.to_string(),
            iat: issued_at,
            exp: issued_at + self.ttl_secs,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// 验证顾客 Token
    pub fn verify_user_token(&self, token: &str) -> Result<UserClaims, InvalidToken> {
        self.verify(token)
    }

    fn verify<C: DeserializeOwned>(&self, token: &str) -> Result<C, InvalidToken> {
        let token_data = decode::<C>(token, &self.decoding, &Validation::default())?;
        Ok(token_data.claims)
    }
}

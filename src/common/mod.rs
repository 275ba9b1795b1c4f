//! 公共工具模块

pub mod auth;
pub mod error;
pub mod extract;
pub mod password;

/// 规范化邮箱：去除首尾空白并转为小写
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

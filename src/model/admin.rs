//! 管理员模型

use serde::Serialize;

/// 管理员默认角色
pub const DEFAULT_ADMIN_ROLE: &str = "admin";

/// 管理员记录
#[derive(Debug, Clone)]
pub struct Admin {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: String,
}

impl Admin {
    pub fn new(name: impl Into<String>, email: impl Into<String>, password_hash: String) -> Self {
        Self {
            id: super::new_id(),
            name: name.into(),
            email: email.into(),
            password_hash,
            role: DEFAULT_ADMIN_ROLE.to_string(),
            created_at: super::now_rfc3339(),
        }
    }
}

/// 已通过认证的管理员身份，由认证中间件注入请求扩展
#[derive(Debug, Clone, Serialize)]
pub struct CurrentAdmin {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<Admin> for CurrentAdmin {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id,
            name: admin.name,
            email: admin.email,
            role: admin.role,
        }
    }
}

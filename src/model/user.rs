//! 顾客模型

use serde::Serialize;

/// 顾客记录
///
/// 密码哈希永远不会被序列化到响应中
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(skip)]
    pub password_hash: String,
    pub created_at: String,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: Option<String>,
        address: Option<String>,
        password_hash: String,
    ) -> Self {
        Self {
            id: super::new_id(),
            name: name.into(),
            email: email.into(),
            phone,
            address,
            password_hash,
            created_at: super::now_rfc3339(),
        }
    }

    /// 仅包含联系方式的摘要
    pub fn contact(&self) -> UserContact {
        UserContact {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// 顾客联系方式（订单列表中的展开形式）
#[derive(Debug, Clone, Serialize)]
pub struct UserContact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

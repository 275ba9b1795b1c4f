//! 数据模型
//!
//! 管理员、顾客、商品、订单以及应用配置

pub mod admin;
pub mod config;
pub mod order;
pub mod product;
pub mod user;

/// 当前 UTC 时间（RFC3339，毫秒精度），按字典序即可排序
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// 生成新的文档 ID
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

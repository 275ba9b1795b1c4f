//! Admin API 类型定义

use serde::{Deserialize, Serialize};

use crate::model::order::OrderView;
use crate::model::user::User;

// ============ 认证 ============

/// 登录请求
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// 登录成功响应
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub admin: AdminProfile,
}

/// 管理员公开信息
#[derive(Debug, Serialize)]
pub struct AdminProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

// ============ 仪表盘 ============

/// 仪表盘统计快照
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// 顾客总数
    pub total_users: u64,
    /// 订单总数
    pub total_orders: u64,
    /// 未取消订单的金额之和
    pub total_revenue: f64,
    /// 最近 10 条订单（已展开顾客联系方式和商品名称）
    pub recent_orders: Vec<OrderView>,
}

// ============ 顾客与订单 ============

/// 顾客详情及其订单
#[derive(Debug, Serialize)]
pub struct UserDetailResponse {
    pub user: User,
    pub orders: Vec<OrderView>,
}

/// 更新订单状态请求（字段均可选）
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub order_status: Option<String>,
    pub payment_status: Option<String>,
}

/// 更新订单状态响应
#[derive(Debug, Serialize)]
pub struct OrderStatusResponse {
    pub message: String,
    pub order: OrderView,
}

// ============ 商品管理 ============

/// 创建商品请求
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sizes: Vec<String>,
    /// 图片 URL（通常位于 /uploads 下）
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub stock: i64,
}

/// 更新商品请求（只修改提供了的字段）
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub sizes: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub stock: Option<i64>,
}

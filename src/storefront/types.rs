//! 顾客端 API 类型定义

use serde::{Deserialize, Serialize};

use crate::model::order::ShippingAddress;
use crate::model::user::User;

// ============ 账号 ============

/// 注册请求
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// 顾客登录请求
#[derive(Debug, Deserialize)]
pub struct CustomerLoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// 注册/登录成功响应
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// ============ 商品 ============

/// 商品列表查询参数
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

// ============ 订单 ============

/// 下单请求中的一行
///
/// 数量以有符号整数接收，非法值返回 400 而不是反序列化错误
#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    pub product: String,
    pub quantity: i64,
}

/// 下单请求
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
}

fn default_payment_method() -> String {
    "cod".to_string()
}

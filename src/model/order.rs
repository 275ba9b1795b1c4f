//! 订单模型
//!
//! 订单以单条文档的形式存储：商品行和收货地址保存在同一条记录中，
//! 状态更新即整条记录的替换（后写者生效）。

use serde::{Deserialize, Serialize};

use super::product::{Product, ProductName};
use super::user::{User, UserContact};

/// 订单初始状态
pub const STATUS_PENDING: &str = "pending";
/// 已取消订单不计入营收
pub const STATUS_CANCELLED: &str = "cancelled";

/// 订单行（价格为下单时的快照）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// 商品 ID
    pub product: String,
    pub quantity: u32,
    pub price: f64,
}

/// 收货地址
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingAddress {
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub phone: String,
}

/// 订单记录
#[derive(Debug, Clone)]
pub struct Order {
    pub id: String,
    /// 所属顾客 ID
    pub user: String,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub shipping_address: Option<ShippingAddress>,
    pub payment_method: String,
    pub order_status: String,
    pub payment_status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Order {
    pub fn new(
        user: impl Into<String>,
        items: Vec<OrderItem>,
        shipping_address: Option<ShippingAddress>,
        payment_method: impl Into<String>,
    ) -> Self {
        let now = super::now_rfc3339();
        let total_amount: f64 = items.iter().map(|i| i.price * f64::from(i.quantity)).sum();
        Self {
            id: super::new_id(),
            user: user.into(),
            items,
            total_amount,
            shipping_address,
            payment_method: payment_method.into(),
            order_status: STATUS_PENDING.to_string(),
            payment_status: STATUS_PENDING.to_string(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// 部分更新订单状态和支付状态
    ///
    /// 只修改提供了的字段，空字符串视为未提供；取值不做枚举校验，原样保存。
    /// 返回是否有字段被修改。
    pub fn apply_status_update(
        &mut self,
        order_status: Option<&str>,
        payment_status: Option<&str>,
    ) -> bool {
        let mut changed = false;
        if let Some(status) = order_status.filter(|s| !s.is_empty()) {
            self.order_status = status.to_string();
            changed = true;
        }
        if let Some(status) = payment_status.filter(|s| !s.is_empty()) {
            self.payment_status = status.to_string();
            changed = true;
        }
        if changed {
            self.updated_at = super::now_rfc3339();
        }
        changed
    }
}

/// 订单展开方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    /// 顾客联系方式 + 商品名称（订单列表、仪表盘）
    Summary,
    /// 完整顾客资料 + 完整商品（订单详情、状态更新）
    Full,
    /// 保留顾客 ID + 完整商品（某个顾客自己的订单）
    ProductsOnly,
}

/// 展开后的顾客引用
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum UserRef {
    Id(String),
    Contact(UserContact),
    Profile(User),
}

/// 展开后的商品引用
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ProductRef {
    Name(ProductName),
    Full(Product),
}

/// 订单行响应；商品已被删除时为 null
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    pub product: Option<ProductRef>,
    pub quantity: u32,
    pub price: f64,
}

/// 订单响应（引用已展开）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: String,
    pub user: Option<UserRef>,
    pub items: Vec<OrderItemView>,
    pub total_amount: f64,
    pub shipping_address: Option<ShippingAddress>,
    pub payment_method: String,
    pub order_status: String,
    pub payment_status: String,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> Order {
        Order::new(
            "user-1",
            vec![
                OrderItem {
                    product: "p-1".to_string(),
                    quantity: 2,
                    price: 40.0,
                },
                OrderItem {
                    product: "p-2".to_string(),
                    quantity: 1,
                    price: 20.0,
                },
            ],
            None,
            "cod",
        )
    }

    #[test]
    fn test_new_order_totals_and_defaults() {
        let order = sample_order();
        assert_eq!(order.total_amount, 100.0);
        assert_eq!(order.order_status, STATUS_PENDING);
        assert_eq!(order.payment_status, STATUS_PENDING);
        assert_eq!(order.created_at, order.updated_at);
    }

    #[test]
    fn test_payment_status_only_leaves_order_status() {
        let mut order = sample_order();
        order.order_status = "shipped".to_string();

        assert!(order.apply_status_update(None, Some("paid")));
        assert_eq!(order.payment_status, "paid");
        assert_eq!(order.order_status, "shipped");
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let mut order = sample_order();
        let before = order.updated_at.clone();

        assert!(!order.apply_status_update(Some(""), Some("")));
        assert_eq!(order.order_status, STATUS_PENDING);
        assert_eq!(order.payment_status, STATUS_PENDING);
        assert_eq!(order.updated_at, before);
    }

    #[test]
    fn test_status_values_are_stored_verbatim() {
        let mut order = sample_order();
        order.apply_status_update(Some("on-hold-custom"), None);
        assert_eq!(order.order_status, "on-hold-custom");
    }

    #[test]
    fn test_untagged_refs_serialize_flat() {
        let id = serde_json::to_value(UserRef::Id("u-1".to_string())).unwrap();
        assert_eq!(id, serde_json::json!("u-1"));

        let name = serde_json::to_value(ProductRef::Name(ProductName {
            id: "p-1".to_string(),
            name: "Summer Dress".to_string(),
        }))
        .unwrap();
        assert_eq!(name, serde_json::json!({"id": "p-1", "name": "Summer Dress"}));
    }
}

//! 商品模型

use serde::Serialize;

/// 商品记录
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub sizes: Vec<String>,
    /// 图片 URL，通常指向 /uploads 下的文件
    pub images: Vec<String>,
    pub stock: i64,
    pub created_at: String,
}

/// 商品名称摘要（订单列表中的展开形式）
#[derive(Debug, Clone, Serialize)]
pub struct ProductName {
    pub id: String,
    pub name: String,
}

impl Product {
    pub fn name_only(&self) -> ProductName {
        ProductName {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

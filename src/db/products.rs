//! 商品集合

use rusqlite::{Connection, OptionalExtension, Row, params};

use super::{StoreError, json_column};
use crate::model::product::Product;

const COLUMNS: &str = "id, name, description, price, category, sizes, images, stock, created_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        category: row.get(4)?,
        sizes: json_column(row, 5)?,
        images: json_column(row, 6)?,
        stock: row.get(7)?,
        created_at: row.get(8)?,
    })
}

/// 商品列表过滤条件
#[derive(Debug, Default, Clone)]
pub struct ProductFilter {
    pub category: Option<String>,
    /// 名称或描述包含的关键字（不区分大小写）
    pub search: Option<String>,
}

pub fn insert(conn: &Connection, product: &Product) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO products (id, name, description, price, category, sizes, images, stock, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            product.id,
            product.name,
            product.description,
            product.price,
            product.category,
            serde_json::to_string(&product.sizes)?,
            serde_json::to_string(&product.images)?,
            product.stock,
            product.created_at,
        ],
    )?;
    Ok(())
}

/// 整条替换商品（ID 和创建时间不变）
pub fn replace(conn: &Connection, product: &Product) -> Result<bool, StoreError> {
    let changed = conn.execute(
        "UPDATE products SET name = ?1, description = ?2, price = ?3, category = ?4,
         sizes = ?5, images = ?6, stock = ?7 WHERE id = ?8",
        params![
            product.name,
            product.description,
            product.price,
            product.category,
            serde_json::to_string(&product.sizes)?,
            serde_json::to_string(&product.images)?,
            product.stock,
            product.id,
        ],
    )?;
    Ok(changed > 0)
}

pub fn delete(conn: &Connection, id: &str) -> Result<bool, StoreError> {
    let deleted = conn.execute("DELETE FROM products WHERE id = ?1", [id])?;
    Ok(deleted > 0)
}

pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<Product>, StoreError> {
    let product = conn
        .query_row(
            &format!("SELECT {} FROM products WHERE id = ?1", COLUMNS),
            [id],
            from_row,
        )
        .optional()?;
    Ok(product)
}

/// 转义 LIKE 通配符，使关键字按字面匹配
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// 按条件列出商品，最新的在前
pub fn list(conn: &Connection, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
    let mut where_clauses = Vec::new();
    let mut values: Vec<String> = Vec::new();

    if let Some(category) = filter.category.as_deref().filter(|c| !c.is_empty()) {
        values.push(category.to_string());
        where_clauses.push(format!("category = ?{}", values.len()));
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        values.push(format!("%{}%", escape_like(&search.to_lowercase())));
        let idx = values.len();
        where_clauses.push(format!(
            "(LOWER(name) LIKE ?{idx} ESCAPE '\\' OR LOWER(description) LIKE ?{idx} ESCAPE '\\')"
        ));
    }

    let where_sql = if where_clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", where_clauses.join(" AND "))
    };

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM products {} ORDER BY created_at DESC, rowid DESC",
        COLUMNS, where_sql
    ))?;
    let products = stmt
        .query_map(rusqlite::params_from_iter(values.iter()), from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(products)
}

/// 扣减库存，库存不足时不修改并返回 false
pub fn take_stock(conn: &Connection, id: &str, quantity: u32) -> Result<bool, StoreError> {
    let changed = conn.execute(
        "UPDATE products SET stock = stock - ?1 WHERE id = ?2 AND stock >= ?1",
        params![quantity, id],
    )?;
    Ok(changed > 0)
}

#[cfg(test)]
pub(crate) fn sample(name: &str, category: &str, price: f64, stock: i64) -> Product {
    Product {
        id: crate::model::new_id(),
        name: name.to_string(),
        description: format!("{} description", name),
        price,
        category: category.to_string(),
        sizes: vec!["S".to_string(), "M".to_string()],
        images: vec![format!("/uploads/{}.jpg", name)],
        stock,
        created_at: crate::model::now_rfc3339(),
    }
}

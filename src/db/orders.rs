//! 订单集合
//!
//! 包含下单事务、仪表盘聚合查询和引用展开（populate）

use std::collections::HashMap;

use rusqlite::{Connection, OptionalExtension, Row, params};

use super::{StoreError, json_column, json_column_opt, products, users};
use crate::model::order::{
    Expansion, Order, OrderItem, OrderItemView, OrderView, ProductRef, STATUS_CANCELLED,
    ShippingAddress, UserRef,
};

const COLUMNS: &str = "id, user_id, items, total_amount, shipping_address, payment_method, \
                       order_status, payment_status, created_at, updated_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Order> {
    Ok(Order {
        id: row.get(0)?,
        user: row.get(1)?,
        items: json_column(row, 2)?,
        total_amount: row.get(3)?,
        shipping_address: json_column_opt(row, 4)?,
        payment_method: row.get(5)?,
        order_status: row.get(6)?,
        payment_status: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

pub fn insert(conn: &Connection, order: &Order) -> Result<(), StoreError> {
    let shipping = order
        .shipping_address
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    conn.execute(
        "INSERT INTO orders (id, user_id, items, total_amount, shipping_address, payment_method,
                             order_status, payment_status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            order.id,
            order.user,
            serde_json::to_string(&order.items)?,
            order.total_amount,
            shipping,
            order.payment_method,
            order.order_status,
            order.payment_status,
            order.created_at,
            order.updated_at,
        ],
    )?;
    Ok(())
}

pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<Order>, StoreError> {
    let order = conn
        .query_row(
            &format!("SELECT {} FROM orders WHERE id = ?1", COLUMNS),
            [id],
            from_row,
        )
        .optional()?;
    Ok(order)
}

/// 全部订单，最新的在前
pub fn list(conn: &Connection) -> Result<Vec<Order>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM orders ORDER BY created_at DESC, rowid DESC",
        COLUMNS
    ))?;
    let orders = stmt
        .query_map([], from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(orders)
}

/// 最近的 `limit` 条订单
pub fn list_recent(conn: &Connection, limit: u32) -> Result<Vec<Order>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM orders ORDER BY created_at DESC, rowid DESC LIMIT ?1",
        COLUMNS
    ))?;
    let orders = stmt
        .query_map([limit], from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(orders)
}

/// 某个顾客的订单，最新的在前
pub fn list_by_user(conn: &Connection, user_id: &str) -> Result<Vec<Order>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM orders WHERE user_id = ?1 ORDER BY created_at DESC, rowid DESC",
        COLUMNS
    ))?;
    let orders = stmt
        .query_map([user_id], from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(orders)
}

pub fn count(conn: &Connection) -> Result<u64, StoreError> {
    let total: i64 = conn.query_row("SELECT COUNT(*) FROM orders", [], |row| row.get(0))?;
    Ok(total as u64)
}

/// 营收：所有未取消订单的 totalAmount 之和，没有订单时为 0
pub fn total_revenue(conn: &Connection) -> Result<f64, StoreError> {
    let total: f64 = conn.query_row(
        "SELECT COALESCE(SUM(total_amount), 0.0) FROM orders WHERE order_status != ?1",
        [STATUS_CANCELLED],
        |row| row.get(0),
    )?;
    Ok(total)
}

/// 保存订单状态字段（单条记录替换，后写者生效）
pub fn save_status(conn: &Connection, order: &Order) -> Result<bool, StoreError> {
    let changed = conn.execute(
        "UPDATE orders SET order_status = ?1, payment_status = ?2, updated_at = ?3 WHERE id = ?4",
        params![
            order.order_status,
            order.payment_status,
            order.updated_at,
            order.id
        ],
    )?;
    Ok(changed > 0)
}

/// 下单请求中的一行
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub product: String,
    pub quantity: u32,
}

/// 下单被拒绝的原因（业务错误，不是存储错误）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderRejection {
    Empty,
    InvalidQuantity { product: String },
    UnknownProduct { product: String },
    OutOfStock { product: String },
}

/// 在单个事务中校验商品、扣减库存并写入订单
///
/// 价格取自商品目录；任意一行被拒绝时整个事务回滚。
pub fn place(
    conn: &mut Connection,
    user_id: &str,
    lines: &[OrderLine],
    shipping_address: Option<ShippingAddress>,
    payment_method: &str,
) -> Result<Result<Order, OrderRejection>, StoreError> {
    if lines.is_empty() {
        return Ok(Err(OrderRejection::Empty));
    }

    let tx = conn.transaction()?;
    let mut items = Vec::with_capacity(lines.len());

    for line in lines {
        if line.quantity == 0 {
            return Ok(Err(OrderRejection::InvalidQuantity {
                product: line.product.clone(),
            }));
        }
        let Some(product) = products::find_by_id(&tx, &line.product)? else {
            return Ok(Err(OrderRejection::UnknownProduct {
                product: line.product.clone(),
            }));
        };
        if !products::take_stock(&tx, &product.id, line.quantity)? {
            return Ok(Err(OrderRejection::OutOfStock {
                product: product.name,
            }));
        }
        items.push(OrderItem {
            product: product.id,
            quantity: line.quantity,
            price: product.price,
        });
    }

    let order = Order::new(user_id, items, shipping_address, payment_method);
    insert(&tx, &order)?;
    tx.commit()?;
    Ok(Ok(order))
}

/// 展开订单中的顾客和商品引用
///
/// 同一批订单内对相同 ID 只查询一次；引用已不存在时展开为 null。
pub fn expand(
    conn: &Connection,
    orders: Vec<Order>,
    expansion: Expansion,
) -> Result<Vec<OrderView>, StoreError> {
    let mut user_cache: HashMap<String, Option<UserRef>> = HashMap::new();
    let mut product_cache: HashMap<String, Option<ProductRef>> = HashMap::new();
    let mut views = Vec::with_capacity(orders.len());

    for order in orders {
        let user = match expansion {
            Expansion::ProductsOnly => Some(UserRef::Id(order.user.clone())),
            Expansion::Summary | Expansion::Full => {
                if !user_cache.contains_key(&order.user) {
                    let resolved = users::find_by_id(conn, &order.user)?.map(|u| {
                        if expansion == Expansion::Summary {
                            UserRef::Contact(u.contact())
                        } else {
                            UserRef::Profile(u)
                        }
                    });
                    user_cache.insert(order.user.clone(), resolved);
                }
                user_cache.get(&order.user).cloned().flatten()
            }
        };

        let mut items = Vec::with_capacity(order.items.len());
        for item in order.items {
            if !product_cache.contains_key(&item.product) {
                let resolved = products::find_by_id(conn, &item.product)?.map(|p| {
                    if expansion == Expansion::Summary {
                        ProductRef::Name(p.name_only())
                    } else {
                        ProductRef::Full(p)
                    }
                });
                product_cache.insert(item.product.clone(), resolved);
            }
            items.push(OrderItemView {
                product: product_cache.get(&item.product).cloned().flatten(),
                quantity: item.quantity,
                price: item.price,
            });
        }

        views.push(OrderView {
            id: order.id,
            user,
            items,
            total_amount: order.total_amount,
            shipping_address: order.shipping_address,
            payment_method: order.payment_method,
            order_status: order.order_status,
            payment_status: order.payment_status,
            created_at: order.created_at,
            updated_at: order.updated_at,
        });
    }

    Ok(views)
}

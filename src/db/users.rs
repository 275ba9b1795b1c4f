//! 顾客集合

use rusqlite::{Connection, OptionalExtension, Row, params};

use super::StoreError;
use crate::model::user::User;

const COLUMNS: &str = "id, name, email, phone, address, password_hash, created_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        address: row.get(4)?,
        password_hash: row.get(5)?,
        created_at: row.get(6)?,
    })
}

pub fn insert(conn: &Connection, user: &User) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO users (id, name, email, phone, address, password_hash, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user.id,
            user.name,
            user.email,
            user.phone,
            user.address,
            user.password_hash,
            user.created_at,
        ],
    )?;
    Ok(())
}

pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<User>, StoreError> {
    let user = conn
        .query_row(
            &format!("SELECT {} FROM users WHERE id = ?1", COLUMNS),
            [id],
            from_row,
        )
        .optional()?;
    Ok(user)
}

pub fn find_by_email(conn: &Connection, email: &str) -> Result<Option<User>, StoreError> {
    let user = conn
        .query_row(
            &format!("SELECT {} FROM users WHERE email = ?1", COLUMNS),
            [email],
            from_row,
        )
        .optional()?;
    Ok(user)
}

/// 全部顾客，按注册时间倒序
pub fn list(conn: &Connection) -> Result<Vec<User>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM users ORDER BY created_at DESC, rowid DESC",
        COLUMNS
    ))?;
    let users = stmt
        .query_map([], from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(users)
}

pub fn count(conn: &Connection) -> Result<u64, StoreError> {
    let total: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    Ok(total as u64)
}

//! 管理员集合

use rusqlite::{Connection, OptionalExtension, Row, params};

use super::StoreError;
use crate::model::admin::Admin;

const COLUMNS: &str = "id, name, email, password_hash, role, created_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Admin> {
    Ok(Admin {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub fn insert(conn: &Connection, admin: &Admin) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO admins (id, name, email, password_hash, role, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            admin.id,
            admin.name,
            admin.email,
            admin.password_hash,
            admin.role,
            admin.created_at,
        ],
    )?;
    Ok(())
}

pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<Admin>, StoreError> {
    let admin = conn
        .query_row(
            &format!("SELECT {} FROM admins WHERE id = ?1", COLUMNS),
            [id],
            from_row,
        )
        .optional()?;
    Ok(admin)
}

pub fn find_by_email(conn: &Connection, email: &str) -> Result<Option<Admin>, StoreError> {
    let admin = conn
        .query_row(
            &format!("SELECT {} FROM admins WHERE email = ?1", COLUMNS),
            [email],
            from_row,
        )
        .optional()?;
    Ok(admin)
}

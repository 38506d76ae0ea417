//! Category storage. Categories are not full-text indexed; they reach search
//! only indirectly, as filters the caller applies to bookmark results.

use rusqlite::{params, Connection, Row, ToSql};

use crate::error::Result;
use crate::types::{Category, NewCategory, UpdateCategory};

fn row_to_category(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        is_predefined: row.get(3)?,
    })
}

const SELECT: &str = "SELECT id, name, description, is_predefined FROM categories";

pub fn create(conn: &Connection, new: &NewCategory) -> Result<Category> {
    conn.execute(
        "INSERT INTO categories (name, description, is_predefined) VALUES (?1, ?2, ?3)",
        params![new.name, new.description, new.is_predefined],
    )?;
    let id = conn.last_insert_rowid();
    let mut stmt = conn.prepare(&format!("{SELECT} WHERE id = ?1"))?;
    let category = stmt.query_row([id], row_to_category)?;
    Ok(category)
}

pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Category>> {
    let mut stmt = conn.prepare(&format!("{SELECT} WHERE id = ?1"))?;
    let mut rows = stmt.query_map([id], row_to_category)?;
    Ok(rows.next().transpose()?)
}

pub fn get_by_name(conn: &Connection, name: &str) -> Result<Option<Category>> {
    let mut stmt = conn.prepare(&format!("{SELECT} WHERE name = ?1"))?;
    let mut rows = stmt.query_map([name], row_to_category)?;
    Ok(rows.next().transpose()?)
}

pub fn get_all(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare(&format!("{SELECT} ORDER BY name"))?;
    let rows = stmt.query_map([], row_to_category)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn get_predefined(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare(&format!("{SELECT} WHERE is_predefined = 1 ORDER BY name"))?;
    let rows = stmt.query_map([], row_to_category)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn update(conn: &Connection, id: i64, updates: &UpdateCategory) -> Result<Option<Category>> {
    if updates.name.is_none() && updates.description.is_none() {
        return get_by_id(conn, id);
    }

    let mut sets: Vec<&str> = Vec::new();
    let mut values: Vec<&dyn ToSql> = Vec::new();
    if let Some(name) = &updates.name {
        sets.push("name = ?");
        values.push(name);
    }
    if let Some(description) = &updates.description {
        sets.push("description = ?");
        values.push(description);
    }
    values.push(&id);

    let sql = format!("UPDATE categories SET {} WHERE id = ?", sets.join(", "));
    conn.execute(&sql, &values[..])?;
    get_by_id(conn, id)
}

/// Predefined categories are refused; returns whether a row was removed.
pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
    let changed = conn.execute(
        "DELETE FROM categories WHERE id = ?1 AND is_predefined = 0",
        [id],
    )?;
    Ok(changed > 0)
}

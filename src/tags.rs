//! Tag storage. Tag names are unique; attaching tags to bookmarks lives in
//! the `bookmarks` module with the rest of the link-table handling.

use rusqlite::{params, Connection, Row, ToSql};

use crate::error::Result;
use crate::types::{NewTag, Tag, UpdateTag};

fn row_to_tag(row: &Row<'_>) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
    })
}

const SELECT: &str = "SELECT id, name, color FROM tags";

pub fn create(conn: &Connection, new: &NewTag) -> Result<Tag> {
    conn.execute(
        "INSERT INTO tags (name, color) VALUES (?1, ?2)",
        params![new.name, new.color],
    )?;
    let id = conn.last_insert_rowid();
    let mut stmt = conn.prepare(&format!("{SELECT} WHERE id = ?1"))?;
    let tag = stmt.query_row([id], row_to_tag)?;
    Ok(tag)
}

pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Tag>> {
    let mut stmt = conn.prepare(&format!("{SELECT} WHERE id = ?1"))?;
    let mut rows = stmt.query_map([id], row_to_tag)?;
    Ok(rows.next().transpose()?)
}

pub fn get_by_name(conn: &Connection, name: &str) -> Result<Option<Tag>> {
    let mut stmt = conn.prepare(&format!("{SELECT} WHERE name = ?1"))?;
    let mut rows = stmt.query_map([name], row_to_tag)?;
    Ok(rows.next().transpose()?)
}

pub fn get_all(conn: &Connection) -> Result<Vec<Tag>> {
    let mut stmt = conn.prepare(&format!("{SELECT} ORDER BY name"))?;
    let rows = stmt.query_map([], row_to_tag)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn update(conn: &Connection, id: i64, updates: &UpdateTag) -> Result<Option<Tag>> {
    if updates.name.is_none() && updates.color.is_none() {
        return get_by_id(conn, id);
    }

    let mut sets: Vec<&str> = Vec::new();
    let mut values: Vec<&dyn ToSql> = Vec::new();
    if let Some(name) = &updates.name {
        sets.push("name = ?");
        values.push(name);
    }
    if let Some(color) = &updates.color {
        sets.push("color = ?");
        values.push(color);
    }
    values.push(&id);

    let sql = format!("UPDATE tags SET {} WHERE id = ?", sets.join(", "));
    conn.execute(&sql, &values[..])?;
    get_by_id(conn, id)
}

pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
    let changed = conn.execute("DELETE FROM tags WHERE id = ?1", [id])?;
    Ok(changed > 0)
}

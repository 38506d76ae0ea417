//! Bookmark storage, including the category and tag link tables.
//!
//! Mutations of the searchable fields (title, description) run in a single
//! transaction with the matching index write, so the FTS projection can
//! never outlive or lag its source row.

use rusqlite::{params, Connection, Row, ToSql};

use crate::error::{Error, Result};
use crate::index;
use crate::types::{Bookmark, EntityKind, NewBookmark, UpdateBookmark};

fn row_to_bookmark(row: &Row<'_>) -> rusqlite::Result<Bookmark> {
    Ok(Bookmark {
        id: row.get(0)?,
        title: row.get(1)?,
        url: row.get(2)?,
        description: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

const SELECT: &str = "SELECT id, title, url, description, created_at, updated_at FROM bookmarks";

pub fn create(conn: &mut Connection, new: &NewBookmark) -> Result<Bookmark> {
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO bookmarks (title, url, description) VALUES (?1, ?2, ?3)",
        params![new.title, new.url, new.description],
    )?;
    let id = tx.last_insert_rowid();
    let bookmark = get_by_id(&tx, id)?.ok_or(Error::IndexInconsistency {
        kind: EntityKind::Bookmark,
        id,
    })?;
    index::index_bookmark(&tx, &bookmark)?;
    tx.commit()?;
    Ok(bookmark)
}

pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Bookmark>> {
    let mut stmt = conn.prepare(&format!("{SELECT} WHERE id = ?1"))?;
    let mut rows = stmt.query_map([id], row_to_bookmark)?;
    Ok(rows.next().transpose()?)
}

/// Newest first. `limit` of `None` returns everything.
pub fn get_all(
    conn: &Connection,
    limit: Option<usize>,
    offset: Option<usize>,
) -> Result<Vec<Bookmark>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT} ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2"
    ))?;
    // SQLite treats LIMIT -1 as unbounded.
    let limit = limit.map_or(-1, |n| n as i64);
    let offset = offset.unwrap_or(0) as i64;
    let rows = stmt.query_map(params![limit, offset], row_to_bookmark)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Apply the supplied fields and re-index. Returns `None` when no bookmark
/// has this id; an update with no fields set is just a read.
pub fn update(conn: &mut Connection, id: i64, updates: &UpdateBookmark) -> Result<Option<Bookmark>> {
    if updates.title.is_none() && updates.url.is_none() && updates.description.is_none() {
        return get_by_id(conn, id);
    }

    let tx = conn.transaction()?;
    let mut sets: Vec<&str> = Vec::new();
    let mut values: Vec<&dyn ToSql> = Vec::new();
    if let Some(title) = &updates.title {
        sets.push("title = ?");
        values.push(title);
    }
    if let Some(url) = &updates.url {
        sets.push("url = ?");
        values.push(url);
    }
    if let Some(description) = &updates.description {
        sets.push("description = ?");
        values.push(description);
    }
    sets.push("updated_at = datetime('now')");
    values.push(&id);

    let sql = format!("UPDATE bookmarks SET {} WHERE id = ?", sets.join(", "));
    let changed = tx.execute(&sql, &values[..])?;
    if changed == 0 {
        return Ok(None);
    }

    let bookmark = get_by_id(&tx, id)?.ok_or(Error::IndexInconsistency {
        kind: EntityKind::Bookmark,
        id,
    })?;
    index::reindex_bookmark(&tx, &bookmark)?;
    tx.commit()?;
    Ok(Some(bookmark))
}

/// Delete a bookmark and everything hanging off it. The FK cascade removes
/// child notes and snippets, but only their source rows; their index entries
/// have to go by hand, inside the same transaction.
pub fn delete(conn: &mut Connection, id: i64) -> Result<bool> {
    let tx = conn.transaction()?;
    for note_id in child_ids(&tx, "SELECT id FROM notes WHERE bookmark_id = ?1", id)? {
        index::unindex_note(&tx, note_id)?;
    }
    for snippet_id in child_ids(&tx, "SELECT id FROM code_snippets WHERE bookmark_id = ?1", id)? {
        index::unindex_snippet(&tx, snippet_id)?;
    }
    index::unindex_bookmark(&tx, id)?;
    let changed = tx.execute("DELETE FROM bookmarks WHERE id = ?1", [id])?;
    tx.commit()?;
    Ok(changed > 0)
}

fn child_ids(conn: &Connection, sql: &str, bookmark_id: i64) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare(sql)?;
    let ids = stmt
        .query_map([bookmark_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<i64>>>()?;
    Ok(ids)
}

pub fn add_category(conn: &Connection, bookmark_id: i64, category_id: i64) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO bookmark_categories (bookmark_id, category_id) VALUES (?1, ?2)",
        params![bookmark_id, category_id],
    )?;
    Ok(())
}

pub fn remove_category(conn: &Connection, bookmark_id: i64, category_id: i64) -> Result<()> {
    conn.execute(
        "DELETE FROM bookmark_categories WHERE bookmark_id = ?1 AND category_id = ?2",
        params![bookmark_id, category_id],
    )?;
    Ok(())
}

pub fn get_categories(conn: &Connection, bookmark_id: i64) -> Result<Vec<i64>> {
    let mut stmt =
        conn.prepare("SELECT category_id FROM bookmark_categories WHERE bookmark_id = ?1")?;
    let ids = stmt
        .query_map([bookmark_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<i64>>>()?;
    Ok(ids)
}

pub fn add_tag(conn: &Connection, bookmark_id: i64, tag_id: i64) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO bookmark_tags (bookmark_id, tag_id) VALUES (?1, ?2)",
        params![bookmark_id, tag_id],
    )?;
    Ok(())
}

pub fn remove_tag(conn: &Connection, bookmark_id: i64, tag_id: i64) -> Result<()> {
    conn.execute(
        "DELETE FROM bookmark_tags WHERE bookmark_id = ?1 AND tag_id = ?2",
        params![bookmark_id, tag_id],
    )?;
    Ok(())
}

pub fn get_tags(conn: &Connection, bookmark_id: i64) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare("SELECT tag_id FROM bookmark_tags WHERE bookmark_id = ?1")?;
    let ids = stmt
        .query_map([bookmark_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<i64>>>()?;
    Ok(ids)
}

pub fn get_by_category(conn: &Connection, category_id: i64) -> Result<Vec<Bookmark>> {
    let mut stmt = conn.prepare(
        "SELECT b.id, b.title, b.url, b.description, b.created_at, b.updated_at
         FROM bookmarks b
         INNER JOIN bookmark_categories bc ON b.id = bc.bookmark_id
         WHERE bc.category_id = ?1
         ORDER BY b.created_at DESC, b.id DESC",
    )?;
    let rows = stmt.query_map([category_id], row_to_bookmark)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn get_by_tag(conn: &Connection, tag_id: i64) -> Result<Vec<Bookmark>> {
    let mut stmt = conn.prepare(
        "SELECT b.id, b.title, b.url, b.description, b.created_at, b.updated_at
         FROM bookmarks b
         INNER JOIN bookmark_tags bt ON b.id = bt.bookmark_id
         WHERE bt.tag_id = ?1
         ORDER BY b.created_at DESC, b.id DESC",
    )?;
    let rows = stmt.query_map([tag_id], row_to_bookmark)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

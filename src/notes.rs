//! Notes attached to bookmarks. Content is indexed for search.

use rusqlite::{params, Connection, Row};

use crate::error::{Error, Result};
use crate::index;
use crate::types::{EntityKind, NewNote, Note, UpdateNote};

fn row_to_note(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        bookmark_id: row.get(1)?,
        content: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

const SELECT: &str = "SELECT id, bookmark_id, content, created_at, updated_at FROM notes";

pub fn create(conn: &mut Connection, new: &NewNote) -> Result<Note> {
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO notes (bookmark_id, content) VALUES (?1, ?2)",
        params![new.bookmark_id, new.content],
    )?;
    let id = tx.last_insert_rowid();
    let note = get_by_id(&tx, id)?.ok_or(Error::IndexInconsistency {
        kind: EntityKind::Note,
        id,
    })?;
    index::index_note(&tx, &note)?;
    tx.commit()?;
    Ok(note)
}

pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Note>> {
    let mut stmt = conn.prepare(&format!("{SELECT} WHERE id = ?1"))?;
    let mut rows = stmt.query_map([id], row_to_note)?;
    Ok(rows.next().transpose()?)
}

pub fn get_by_bookmark(conn: &Connection, bookmark_id: i64) -> Result<Vec<Note>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT} WHERE bookmark_id = ?1 ORDER BY created_at DESC, id DESC"
    ))?;
    let rows = stmt.query_map([bookmark_id], row_to_note)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn get_all(conn: &Connection, limit: Option<usize>, offset: Option<usize>) -> Result<Vec<Note>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT} ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2"
    ))?;
    let limit = limit.map_or(-1, |n| n as i64);
    let offset = offset.unwrap_or(0) as i64;
    let rows = stmt.query_map(params![limit, offset], row_to_note)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn update(conn: &mut Connection, id: i64, updates: &UpdateNote) -> Result<Option<Note>> {
    let content = match &updates.content {
        Some(content) => content,
        None => return get_by_id(conn, id),
    };

    let tx = conn.transaction()?;
    let changed = tx.execute(
        "UPDATE notes SET content = ?1, updated_at = datetime('now') WHERE id = ?2",
        params![content, id],
    )?;
    if changed == 0 {
        return Ok(None);
    }

    let note = get_by_id(&tx, id)?.ok_or(Error::IndexInconsistency {
        kind: EntityKind::Note,
        id,
    })?;
    index::reindex_note(&tx, &note)?;
    tx.commit()?;
    Ok(Some(note))
}

pub fn delete(conn: &mut Connection, id: i64) -> Result<bool> {
    let tx = conn.transaction()?;
    index::unindex_note(&tx, id)?;
    let changed = tx.execute("DELETE FROM notes WHERE id = ?1", [id])?;
    tx.commit()?;
    Ok(changed > 0)
}

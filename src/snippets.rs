//! Code snippets attached to bookmarks. Code, description, and language are
//! all indexed for search.

use rusqlite::{params, Connection, Row, ToSql};

use crate::error::{Error, Result};
use crate::index;
use crate::types::{CodeSnippet, EntityKind, NewCodeSnippet, UpdateCodeSnippet};

fn row_to_snippet(row: &Row<'_>) -> rusqlite::Result<CodeSnippet> {
    Ok(CodeSnippet {
        id: row.get(0)?,
        bookmark_id: row.get(1)?,
        language: row.get(2)?,
        code: row.get(3)?,
        description: row.get(4)?,
        created_at: row.get(5)?,
    })
}

const SELECT: &str =
    "SELECT id, bookmark_id, language, code, description, created_at FROM code_snippets";

pub fn create(conn: &mut Connection, new: &NewCodeSnippet) -> Result<CodeSnippet> {
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO code_snippets (bookmark_id, language, code, description) VALUES (?1, ?2, ?3, ?4)",
        params![new.bookmark_id, new.language, new.code, new.description],
    )?;
    let id = tx.last_insert_rowid();
    let snippet = get_by_id(&tx, id)?.ok_or(Error::IndexInconsistency {
        kind: EntityKind::CodeSnippet,
        id,
    })?;
    index::index_snippet(&tx, &snippet)?;
    tx.commit()?;
    Ok(snippet)
}

pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<CodeSnippet>> {
    let mut stmt = conn.prepare(&format!("{SELECT} WHERE id = ?1"))?;
    let mut rows = stmt.query_map([id], row_to_snippet)?;
    Ok(rows.next().transpose()?)
}

pub fn get_by_bookmark(conn: &Connection, bookmark_id: i64) -> Result<Vec<CodeSnippet>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT} WHERE bookmark_id = ?1 ORDER BY created_at DESC, id DESC"
    ))?;
    let rows = stmt.query_map([bookmark_id], row_to_snippet)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn get_all(
    conn: &Connection,
    limit: Option<usize>,
    offset: Option<usize>,
) -> Result<Vec<CodeSnippet>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT} ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2"
    ))?;
    let limit = limit.map_or(-1, |n| n as i64);
    let offset = offset.unwrap_or(0) as i64;
    let rows = stmt.query_map(params![limit, offset], row_to_snippet)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn update(
    conn: &mut Connection,
    id: i64,
    updates: &UpdateCodeSnippet,
) -> Result<Option<CodeSnippet>> {
    if updates.language.is_none() && updates.code.is_none() && updates.description.is_none() {
        return get_by_id(conn, id);
    }

    let tx = conn.transaction()?;
    let mut sets: Vec<&str> = Vec::new();
    let mut values: Vec<&dyn ToSql> = Vec::new();
    if let Some(language) = &updates.language {
        sets.push("language = ?");
        values.push(language);
    }
    if let Some(code) = &updates.code {
        sets.push("code = ?");
        values.push(code);
    }
    if let Some(description) = &updates.description {
        sets.push("description = ?");
        values.push(description);
    }
    values.push(&id);

    let sql = format!("UPDATE code_snippets SET {} WHERE id = ?", sets.join(", "));
    let changed = tx.execute(&sql, &values[..])?;
    if changed == 0 {
        return Ok(None);
    }

    let snippet = get_by_id(&tx, id)?.ok_or(Error::IndexInconsistency {
        kind: EntityKind::CodeSnippet,
        id,
    })?;
    index::reindex_snippet(&tx, &snippet)?;
    tx.commit()?;
    Ok(Some(snippet))
}

pub fn delete(conn: &mut Connection, id: i64) -> Result<bool> {
    let tx = conn.transaction()?;
    index::unindex_snippet(&tx, id)?;
    let changed = tx.execute("DELETE FROM code_snippets WHERE id = ?1", [id])?;
    tx.commit()?;
    Ok(changed > 0)
}

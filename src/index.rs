//! Maintenance of the FTS5 index projections.
//!
//! Each indexed entity has a shadow row in its kind's FTS table, keyed by
//! rowid = entity id. Every function here is meant to run on the caller's
//! open transaction, so the source-row write and the index write commit or
//! roll back together; a failed index write fails the whole mutation.
//! The projections are derived state and can be rebuilt from the source
//! tables at any time with [`rebuild`].

use rusqlite::{params, Connection};

use crate::error::Result;
use crate::types::{Bookmark, CodeSnippet, Note};

pub(crate) fn index_bookmark(conn: &Connection, bookmark: &Bookmark) -> Result<()> {
    conn.execute(
        "INSERT INTO bookmarks_fts (rowid, title, description) VALUES (?1, ?2, ?3)",
        params![bookmark.id, bookmark.title, bookmark.description],
    )?;
    Ok(())
}

pub(crate) fn unindex_bookmark(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM bookmarks_fts WHERE rowid = ?1", [id])?;
    Ok(())
}

/// Re-tokenize a bookmark after an update. The caller passes the merged row
/// as re-read inside the transaction, so fields the update left out keep
/// their previous indexed values.
pub(crate) fn reindex_bookmark(conn: &Connection, bookmark: &Bookmark) -> Result<()> {
    unindex_bookmark(conn, bookmark.id)?;
    index_bookmark(conn, bookmark)
}

pub(crate) fn index_note(conn: &Connection, note: &Note) -> Result<()> {
    conn.execute(
        "INSERT INTO notes_fts (rowid, content) VALUES (?1, ?2)",
        params![note.id, note.content],
    )?;
    Ok(())
}

pub(crate) fn unindex_note(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM notes_fts WHERE rowid = ?1", [id])?;
    Ok(())
}

pub(crate) fn reindex_note(conn: &Connection, note: &Note) -> Result<()> {
    unindex_note(conn, note.id)?;
    index_note(conn, note)
}

pub(crate) fn index_snippet(conn: &Connection, snippet: &CodeSnippet) -> Result<()> {
    conn.execute(
        "INSERT INTO code_snippets_fts (rowid, code, description, language) VALUES (?1, ?2, ?3, ?4)",
        params![snippet.id, snippet.code, snippet.description, snippet.language],
    )?;
    Ok(())
}

pub(crate) fn unindex_snippet(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM code_snippets_fts WHERE rowid = ?1", [id])?;
    Ok(())
}

pub(crate) fn reindex_snippet(conn: &Connection, snippet: &CodeSnippet) -> Result<()> {
    unindex_snippet(conn, snippet.id)?;
    index_snippet(conn, snippet)
}

/// Drop and repopulate all three projections from the source tables in one
/// transaction. Readers never observe a half-built index.
pub fn rebuild(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM bookmarks_fts", [])?;
    tx.execute("DELETE FROM notes_fts", [])?;
    tx.execute("DELETE FROM code_snippets_fts", [])?;
    tx.execute(
        "INSERT INTO bookmarks_fts (rowid, title, description)
         SELECT id, title, description FROM bookmarks",
        [],
    )?;
    tx.execute(
        "INSERT INTO notes_fts (rowid, content) SELECT id, content FROM notes",
        [],
    )?;
    tx.execute(
        "INSERT INTO code_snippets_fts (rowid, code, description, language)
         SELECT id, code, description, language FROM code_snippets",
        [],
    )?;
    tx.commit()?;
    tracing::debug!("rebuilt search index projections");
    Ok(())
}

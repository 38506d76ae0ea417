//! Shared fixtures: every suite runs against a fresh in-memory store.
#![allow(dead_code)]

use bookmark_vault::{bookmarks, db, Bookmark, NewBookmark};
use rusqlite::Connection;

/// Fresh in-memory store with the schema and predefined categories applied.
pub fn store() -> Connection {
    db::open_in_memory().expect("in-memory store")
}

/// Create a bookmark at example.com with the given title and description.
pub fn bookmark(conn: &mut Connection, title: &str, description: Option<&str>) -> Bookmark {
    bookmarks::create(
        conn,
        &NewBookmark {
            title: title.into(),
            url: "https://example.com".into(),
            description: description.map(Into::into),
        },
    )
    .expect("create bookmark")
}

//! Embedded data layer for a personal bookmark manager.
//!
//! Bookmarks, categories, tags, notes, and code snippets live in one SQLite
//! database. The three text-bearing kinds (bookmarks, notes, code snippets)
//! each keep an FTS5 projection, written in the same transaction as the
//! source row; [`search`] queries them per kind and [`search::search_all`]
//! merges the streams into one ranked, budgeted list.
//!
//! Every operation takes an explicit [`rusqlite::Connection`], so callers
//! own the store's lifetime and tests run against [`db::open_in_memory`].

pub mod bookmarks;
pub mod categories;
pub mod db;
pub mod error;
pub mod index;
pub mod notes;
pub mod search;
pub mod snippets;
pub mod tags;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    Bookmark, Category, CodeSnippet, EntityKind, NewBookmark, NewCategory, NewCodeSnippet,
    NewNote, NewTag, Note, SearchResult, Tag, UpdateBookmark, UpdateCategory, UpdateCodeSnippet,
    UpdateNote, UpdateTag,
};

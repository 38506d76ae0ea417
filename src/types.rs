use serde::{Deserialize, Serialize};

/// A saved bookmark. Timestamps are SQLite `datetime('now')` strings (UTC).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Seeded categories are protected from deletion.
    pub is_predefined: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    /// Display color as a `#RRGGBB` string, if the user picked one.
    pub color: Option<String>,
}

/// Free-text note attached to a bookmark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub bookmark_id: i64,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Code sample attached to a bookmark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeSnippet {
    pub id: i64,
    pub bookmark_id: i64,
    pub language: String,
    pub code: String,
    pub description: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBookmark {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub is_predefined: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTag {
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTag {
    pub name: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNote {
    pub bookmark_id: i64,
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNote {
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCodeSnippet {
    pub bookmark_id: i64,
    pub language: String,
    pub code: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCodeSnippet {
    pub language: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
}

/// The three indexed entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Bookmark,
    Note,
    CodeSnippet,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Bookmark => "bookmark",
            EntityKind::Note => "note",
            EntityKind::CodeSnippet => "code_snippet",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ranked search hit. Transient, never persisted.
///
/// `rank` is the bm25 score of the match, lower = better; it is only
/// comparable to ranks from the same query execution. `created_at` rides
/// along so callers (and the aggregator) can break rank ties by recency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    /// Bookmark title, snippet language, or nothing for notes.
    pub title: Option<String>,
    /// Bookmark description, note content, or snippet code.
    pub content: Option<String>,
    /// Excerpt around the match, spans wrapped in `<mark>`..`</mark>`.
    pub snippet: String,
    pub rank: f64,
    pub created_at: String,
}

//! Cross-entity full-text search.
//!
//! Each indexed kind keeps an FTS5 projection of its searchable fields (see
//! `index`); queries score matches with SQLite's bm25, where a lower rank is
//! a better match and ranks are only comparable within one query execution.
//! `search_all` merges the three ranked streams into a single budgeted list.
//!
//! Matching is OR-of-terms: the query is split into alphanumeric terms, each
//! quoted, and joined with `OR`, so a row matches if any term does and bm25
//! rewards rows matching more of them. Quoting also keeps FTS5 operator
//! syntax in user input inert; raw text never reaches the engine's query
//! parser.

use std::cmp::Ordering;

use rusqlite::{params, Connection};

use crate::error::{Error, Result};
use crate::types::{EntityKind, SearchResult};

/// Result budget for [`search_all`] when the caller does not supply one.
pub const DEFAULT_LIMIT: usize = 50;

/// Excerpt configuration shared by the three per-kind queries: match spans
/// wrapped in `<mark>`..`</mark>`, a 32-token window, `...` when truncated.
const SNIPPET_ARGS: &str = "'<mark>', '</mark>', '...', 32";

pub fn search_bookmarks(conn: &Connection, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
    let match_expr = build_match_query(query)?;
    let mut stmt = conn.prepare(&format!(
        "SELECT
             b.id,
             b.title,
             b.description,
             snippet(bookmarks_fts, 0, {SNIPPET_ARGS}),
             bm25(bookmarks_fts) AS rank,
             b.created_at
         FROM bookmarks_fts
         INNER JOIN bookmarks b ON bookmarks_fts.rowid = b.id
         WHERE bookmarks_fts MATCH ?1
         ORDER BY rank, b.created_at DESC, b.id DESC
         LIMIT ?2"
    ))?;
    let rows = stmt.query_map(params![match_expr, limit.max(1) as i64], |row| {
        Ok(SearchResult {
            id: row.get(0)?,
            kind: EntityKind::Bookmark,
            title: Some(row.get(1)?),
            content: row.get(2)?,
            snippet: row.get(3)?,
            rank: row.get(4)?,
            created_at: row.get(5)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn search_notes(conn: &Connection, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
    let match_expr = build_match_query(query)?;
    let mut stmt = conn.prepare(&format!(
        "SELECT
             n.id,
             n.content,
             snippet(notes_fts, 0, {SNIPPET_ARGS}),
             bm25(notes_fts) AS rank,
             n.created_at
         FROM notes_fts
         INNER JOIN notes n ON notes_fts.rowid = n.id
         WHERE notes_fts MATCH ?1
         ORDER BY rank, n.created_at DESC, n.id DESC
         LIMIT ?2"
    ))?;
    let rows = stmt.query_map(params![match_expr, limit.max(1) as i64], |row| {
        Ok(SearchResult {
            id: row.get(0)?,
            kind: EntityKind::Note,
            title: None,
            content: Some(row.get(1)?),
            snippet: row.get(2)?,
            rank: row.get(3)?,
            created_at: row.get(4)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn search_snippets(conn: &Connection, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
    let match_expr = build_match_query(query)?;
    let mut stmt = conn.prepare(&format!(
        "SELECT
             cs.id,
             cs.language,
             cs.code,
             snippet(code_snippets_fts, 0, {SNIPPET_ARGS}),
             bm25(code_snippets_fts) AS rank,
             cs.created_at
         FROM code_snippets_fts
         INNER JOIN code_snippets cs ON code_snippets_fts.rowid = cs.id
         WHERE code_snippets_fts MATCH ?1
         ORDER BY rank, cs.created_at DESC, cs.id DESC
         LIMIT ?2"
    ))?;
    let rows = stmt.query_map(params![match_expr, limit.max(1) as i64], |row| {
        Ok(SearchResult {
            id: row.get(0)?,
            kind: EntityKind::CodeSnippet,
            title: Some(row.get(1)?),
            content: Some(row.get(2)?),
            snippet: row.get(3)?,
            rank: row.get(4)?,
            created_at: row.get(5)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Ranked search within one entity kind. Assumes a validated, non-empty
/// query; zero matches is an empty Vec, not an error.
pub fn search_entities(
    conn: &Connection,
    kind: EntityKind,
    query: &str,
    limit: usize,
) -> Result<Vec<SearchResult>> {
    match kind {
        EntityKind::Bookmark => search_bookmarks(conn, query, limit),
        EntityKind::Note => search_notes(conn, query, limit),
        EntityKind::CodeSnippet => search_snippets(conn, query, limit),
    }
}

/// One ranked list across all three kinds, truncated to `limit`.
///
/// The budget is split evenly with ceiling division so each kind gets a fair
/// initial share, then everything is sorted globally by rank. If the first
/// fan-out leaves the budget unfilled while some kind hit its sub-limit
/// (it may be holding matches back), the fan-out reruns with the full limit,
/// so the result count is min(total matches, limit). If any per-kind search
/// fails, the whole call fails; a silently missing kind would be worse than
/// an error.
pub fn search_all(conn: &Connection, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
    let query = query.trim();
    if query.is_empty() {
        return Err(Error::EmptyQuery);
    }
    let limit = limit.max(1);
    let per_kind = (limit + 2) / 3;

    let mut buckets = fan_out(conn, query, per_kind)?;
    let total: usize = buckets.iter().map(Vec::len).sum();
    if total < limit && buckets.iter().any(|bucket| bucket.len() == per_kind) {
        buckets = fan_out(conn, query, limit)?;
    }

    let mut results: Vec<SearchResult> = buckets.into_iter().flatten().collect();
    // Stable sort: cross-kind ties that survive the full key keep the
    // bookmark/note/snippet concatenation order, so output is reproducible.
    results.sort_by(compare_ranked);
    results.truncate(limit);
    tracing::debug!(query, limit, hits = results.len(), "cross-entity search");
    Ok(results)
}

fn fan_out(conn: &Connection, query: &str, limit: usize) -> Result<[Vec<SearchResult>; 3]> {
    Ok([
        search_bookmarks(conn, query, limit)?,
        search_notes(conn, query, limit)?,
        search_snippets(conn, query, limit)?,
    ])
}

/// Rank ascending (lower bm25 = better), ties broken by recency: newest
/// `created_at` first, then highest id. `created_at` has one-second
/// resolution and ids are monotonic per table, so the order is total for
/// rows of one kind.
fn compare_ranked(a: &SearchResult, b: &SearchResult) -> Ordering {
    a.rank
        .partial_cmp(&b.rank)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| b.id.cmp(&a.id))
}

/// Build an FTS5 MATCH expression from free query text.
fn build_match_query(query: &str) -> Result<String> {
    let terms: Vec<&str> = query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|term| !term.is_empty())
        .collect();
    if terms.is_empty() {
        return Err(Error::InvalidQuery {
            query: query.to_owned(),
        });
    }
    let quoted: Vec<String> = terms.iter().map(|term| format!("\"{term}\"")).collect();
    Ok(quoted.join(" OR "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_query_quotes_and_ors_terms() {
        assert_eq!(
            build_match_query("SQL injection").unwrap(),
            "\"SQL\" OR \"injection\""
        );
    }

    #[test]
    fn match_query_neutralizes_fts_operators() {
        // Operator syntax is reduced to its alphanumeric terms; "AND" becomes
        // a literal (quoted) term rather than a boolean.
        assert_eq!(
            build_match_query("a AND b* NOT \"c\"").unwrap(),
            "\"a\" OR \"AND\" OR \"b\" OR \"NOT\" OR \"c\""
        );
    }

    #[test]
    fn match_query_keeps_unicode_terms() {
        assert_eq!(build_match_query("café 攻撃").unwrap(), "\"café\" OR \"攻撃\"");
    }

    #[test]
    fn match_query_rejects_punctuation_only() {
        assert!(matches!(
            build_match_query("!!! ???"),
            Err(Error::InvalidQuery { .. })
        ));
    }
}

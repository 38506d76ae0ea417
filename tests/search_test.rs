mod common;

use bookmark_vault::{
    bookmarks, index, notes, search, snippets, EntityKind, Error, NewCodeSnippet, NewNote,
    UpdateBookmark,
};
use common::{bookmark, store};
use rusqlite::Connection;

fn note(conn: &mut Connection, bookmark_id: i64, content: &str) {
    notes::create(
        conn,
        &NewNote {
            bookmark_id,
            content: content.into(),
        },
    )
    .unwrap();
}

fn snippet(conn: &mut Connection, bookmark_id: i64, language: &str, code: &str, description: Option<&str>) {
    snippets::create(
        conn,
        &NewCodeSnippet {
            bookmark_id,
            language: language.into(),
            code: code.into(),
            description: description.map(Into::into),
        },
    )
    .unwrap();
}

// --- Per-entity ranked search ---

/// A term taken verbatim from a searchable field finds the entity.
#[test]
fn bookmark_found_by_title_term() {
    let mut conn = store();
    let created = bookmark(
        &mut conn,
        "SQL Injection Prevention",
        Some("Learn about preventing SQL injection attacks"),
    );
    bookmark(&mut conn, "XSS Protection", Some("Cross-site scripting prevention"));
    bookmark(&mut conn, "CSRF Tokens", Some("Understanding CSRF protection"));

    let results = search::search_bookmarks(&conn, "SQL injection", 10).unwrap();

    assert!(!results.is_empty());
    assert_eq!(results[0].kind, EntityKind::Bookmark);
    assert_eq!(results[0].id, created.id);
    assert!(results[0].title.as_deref().unwrap().contains("SQL"));
}

#[test]
fn bookmark_found_by_description_term() {
    let mut conn = store();
    bookmark(
        &mut conn,
        "Security Guide",
        Some("A comprehensive guide to cryptography and encryption"),
    );

    let results = search::search_bookmarks(&conn, "cryptography", 10).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].kind, EntityKind::Bookmark);
}

/// Zero matches is an empty sequence, not an error.
#[test]
fn no_match_returns_empty() {
    let mut conn = store();
    bookmark(&mut conn, "Test Bookmark", Some("Test description"));

    let results = search::search_bookmarks(&conn, "nonexistent", 10).unwrap();
    assert!(results.is_empty());
}

/// More term occurrences score better (lower bm25 rank).
#[test]
fn relevance_prefers_heavier_term_use() {
    let mut conn = store();
    let heavy = bookmark(&mut conn, "Security Security Security", Some("Security"));
    let light = bookmark(&mut conn, "Test", Some("Security"));

    let results = search::search_bookmarks(&conn, "security", 10).unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, heavy.id);
    assert_eq!(results[1].id, light.id);
    assert!(results[0].rank < results[1].rank);
}

/// Matching is OR-of-terms: a row matching only one of two terms still hits.
#[test]
fn or_semantics_match_any_term() {
    let mut conn = store();
    let created = bookmark(&mut conn, "Injection basics", None);

    let results = search::search_bookmarks(&conn, "sql injection", 10).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, created.id);
}

#[test]
fn notes_found_by_content() {
    let mut conn = store();
    let parent = bookmark(&mut conn, "Parent", None);
    note(&mut conn, parent.id, "This note discusses authentication mechanisms and OAuth2 flows");
    note(&mut conn, parent.id, "Another note about authorization policies");

    let results = search::search_notes(&conn, "authentication OAuth2", 10).unwrap();

    assert!(!results.is_empty());
    assert_eq!(results[0].kind, EntityKind::Note);
    assert!(results[0].title.is_none());
    assert!(results[0].content.as_deref().unwrap().contains("authentication"));
}

#[test]
fn snippets_found_by_code_description_and_language() {
    let mut conn = store();
    let parent = bookmark(&mut conn, "Parent", None);
    snippet(
        &mut conn,
        parent.id,
        "javascript",
        "function hashPassword(password) { return bcrypt.hash(password); }",
        Some("Password hashing example"),
    );
    snippet(&mut conn, parent.id, "python", "import jwt", Some("JWT token generation example"));

    let by_code = search::search_snippets(&conn, "bcrypt hash password", 10).unwrap();
    assert!(!by_code.is_empty());
    assert_eq!(by_code[0].kind, EntityKind::CodeSnippet);
    assert_eq!(by_code[0].title.as_deref(), Some("javascript"));

    let by_description = search::search_snippets(&conn, "JWT token", 10).unwrap();
    assert!(!by_description.is_empty());

    let by_language = search::search_snippets(&conn, "python", 10).unwrap();
    assert_eq!(by_language.len(), 1);
}

/// The snippet excerpt wraps match spans in `<mark>` delimiters.
#[test]
fn snippet_excerpt_marks_matches() {
    let mut conn = store();
    bookmark(&mut conn, "SQL Injection Prevention", None);

    let results = search::search_bookmarks(&conn, "injection", 10).unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].snippet.contains("<mark>"));
    assert!(results[0].snippet.to_lowercase().contains("injection"));
}

/// Equal-rank entities order newest-first; repeated runs agree.
#[test]
fn equal_ranks_break_ties_by_recency() {
    let mut conn = store();
    let older = bookmark(&mut conn, "Security Alert", None);
    let newer = bookmark(&mut conn, "Security Alert", None);

    let results = search::search_bookmarks(&conn, "security", 10).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].rank, results[1].rank);
    assert_eq!(results[0].id, newer.id);
    assert_eq!(results[1].id, older.id);

    let again = search::search_bookmarks(&conn, "security", 10).unwrap();
    assert_eq!(results, again);
}

#[test]
fn per_kind_limit_truncates() {
    let mut conn = store();
    let parent = bookmark(&mut conn, "Parent", None);
    for i in 0..8 {
        note(&mut conn, parent.id, &format!("testing note {i}"));
    }

    let results = search::search_notes(&conn, "testing", 5).unwrap();
    assert_eq!(results.len(), 5);
}

#[test]
fn search_entities_dispatches_by_kind() {
    let mut conn = store();
    let parent = bookmark(&mut conn, "keyword in title", None);
    note(&mut conn, parent.id, "keyword in note");
    snippet(&mut conn, parent.id, "rust", "let keyword = 1;", None);

    for kind in [EntityKind::Bookmark, EntityKind::Note, EntityKind::CodeSnippet] {
        let results = search::search_entities(&conn, kind, "keyword", 10).unwrap();
        assert_eq!(results.len(), 1, "{kind} should match exactly once");
        assert_eq!(results[0].kind, kind);
    }
}

// --- Index maintenance invariants ---

/// Deleted entities never come back for their former field terms.
#[test]
fn deleted_entities_leave_the_index() {
    let mut conn = store();
    let parent = bookmark(&mut conn, "Parent", None);
    let doomed = notes::create(
        &mut conn,
        &NewNote {
            bookmark_id: parent.id,
            content: "ephemeral content".into(),
        },
    )
    .unwrap();

    assert_eq!(search::search_notes(&conn, "ephemeral", 10).unwrap().len(), 1);
    notes::delete(&mut conn, doomed.id).unwrap();
    assert!(search::search_notes(&conn, "ephemeral", 10).unwrap().is_empty());
}

/// Cascade-deleted children disappear from the index along with the parent.
#[test]
fn bookmark_delete_unindexes_cascaded_children() {
    let mut conn = store();
    let parent = bookmark(&mut conn, "keyword parent", None);
    note(&mut conn, parent.id, "keyword note");
    snippet(&mut conn, parent.id, "rust", "keyword();", None);

    bookmarks::delete(&mut conn, parent.id).unwrap();

    assert!(search::search_all(&conn, "keyword", 50).unwrap().is_empty());
}

/// An update re-tokenizes: old terms stop matching, new terms start.
#[test]
fn update_reindexes_changed_fields() {
    let mut conn = store();
    let created = bookmark(&mut conn, "Obsolete wording", None);

    bookmarks::update(
        &mut conn,
        created.id,
        &UpdateBookmark {
            title: Some("Fresh phrasing".into()),
            ..Default::default()
        },
    )
    .unwrap()
    .unwrap();

    assert!(search::search_bookmarks(&conn, "obsolete", 10).unwrap().is_empty());
    assert_eq!(search::search_bookmarks(&conn, "fresh", 10).unwrap().len(), 1);
}

/// Fields left out of an update keep their indexed values.
#[test]
fn update_keeps_untouched_fields_indexed() {
    let mut conn = store();
    let created = bookmark(&mut conn, "Old title", Some("timeless description"));

    bookmarks::update(
        &mut conn,
        created.id,
        &UpdateBookmark {
            title: Some("New title".into()),
            ..Default::default()
        },
    )
    .unwrap()
    .unwrap();

    assert_eq!(search::search_bookmarks(&conn, "timeless", 10).unwrap().len(), 1);
}

/// The projections are derived state: wiping and rebuilding restores them.
#[test]
fn rebuild_restores_projections() {
    let mut conn = store();
    let parent = bookmark(&mut conn, "rebuildable title", None);
    note(&mut conn, parent.id, "rebuildable note");
    snippet(&mut conn, parent.id, "rust", "rebuildable();", None);

    conn.execute("DELETE FROM bookmarks_fts", []).unwrap();
    conn.execute("DELETE FROM notes_fts", []).unwrap();
    conn.execute("DELETE FROM code_snippets_fts", []).unwrap();
    assert!(search::search_all(&conn, "rebuildable", 50).unwrap().is_empty());

    index::rebuild(&mut conn).unwrap();

    let results = search::search_all(&conn, "rebuildable", 50).unwrap();
    assert_eq!(results.len(), 3);
}

// --- Aggregator ---

/// One hit per kind: the merged result set spans all three.
#[test]
fn search_all_covers_every_kind() {
    let mut conn = store();
    let parent = bookmark(&mut conn, "Security Best Practices", Some("Learn about security"));
    note(&mut conn, parent.id, "Notes about security implementations");
    snippet(
        &mut conn,
        parent.id,
        "javascript",
        "const security = require(\"security-lib\");",
        Some("Security library example"),
    );

    let results = search::search_all(&conn, "security", search::DEFAULT_LIMIT).unwrap();

    let kinds: std::collections::HashSet<EntityKind> =
        results.iter().map(|r| r.kind).collect();
    assert!(kinds.contains(&EntityKind::Bookmark));
    assert!(kinds.contains(&EntityKind::Note));
    assert!(kinds.contains(&EntityKind::CodeSnippet));
}

/// Twenty matching notes against a budget of ten: exactly ten come back,
/// even though the fair-share split alone would fetch fewer.
#[test]
fn search_all_fills_the_budget() {
    let mut conn = store();
    let parent = bookmark(&mut conn, "Parent", None);
    for i in 0..20 {
        note(&mut conn, parent.id, &format!("note number {i} with keyword testing"));
    }

    let results = search::search_all(&conn, "testing", 10).unwrap();
    assert_eq!(results.len(), 10);
    assert!(results.iter().all(|r| r.kind == EntityKind::Note));
}

#[test]
fn search_all_orders_by_rank_globally() {
    let mut conn = store();
    let parent = bookmark(&mut conn, "testing testing testing", Some("testing"));
    note(&mut conn, parent.id, "testing once in passing, among much other text entirely");
    snippet(&mut conn, parent.id, "rust", "testing()", None);

    let results = search::search_all(&conn, "testing", 50).unwrap();

    assert!(results.len() >= 3);
    for window in results.windows(2) {
        assert!(window[0].rank <= window[1].rank, "ranks must be non-decreasing");
    }
    // Not grouped by kind: the heavy-use bookmark outranks the weak note.
    assert_eq!(results[0].kind, EntityKind::Bookmark);
}

/// Same query, no writes in between: byte-identical ordered output.
#[test]
fn search_all_is_idempotent() {
    let mut conn = store();
    let parent = bookmark(&mut conn, "alpha beta", Some("beta gamma"));
    note(&mut conn, parent.id, "alpha gamma");
    note(&mut conn, parent.id, "beta beta alpha");
    snippet(&mut conn, parent.id, "rust", "alpha(); beta();", Some("gamma"));

    let first = search::search_all(&conn, "alpha beta gamma", 50).unwrap();
    let second = search::search_all(&conn, "alpha beta gamma", 50).unwrap();
    assert_eq!(first, second);
}

#[test]
fn search_all_result_count_never_exceeds_limit() {
    let mut conn = store();
    let parent = bookmark(&mut conn, "testing", Some("testing"));
    for i in 0..5 {
        note(&mut conn, parent.id, &format!("testing {i}"));
        snippet(&mut conn, parent.id, "rust", &format!("testing_{i}()"), None);
    }

    for limit in [1, 2, 3, 7, 50] {
        let results = search::search_all(&conn, "testing", limit).unwrap();
        assert!(results.len() <= limit);
    }
}

// --- Failure modes ---

/// Empty and whitespace-only queries are rejected before the index is hit.
#[test]
fn empty_query_is_a_validation_error() {
    let conn = store();
    assert!(matches!(search::search_all(&conn, "", 10), Err(Error::EmptyQuery)));
    assert!(matches!(search::search_all(&conn, "   \t", 10), Err(Error::EmptyQuery)));
}

/// Term-free queries surface as InvalidQuery, not as zero results, and the
/// aggregator fails whole rather than dropping a kind.
#[test]
fn punctuation_only_query_is_invalid() {
    let mut conn = store();
    bookmark(&mut conn, "anything", None);

    assert!(matches!(
        search::search_bookmarks(&conn, "!!!", 10),
        Err(Error::InvalidQuery { .. })
    ));
    assert!(matches!(
        search::search_all(&conn, "?!,.", 10),
        Err(Error::InvalidQuery { .. })
    ));
}

/// FTS5 operator syntax in user input is matched literally, never parsed.
#[test]
fn operator_syntax_does_not_reach_the_engine() {
    let mut conn = store();
    bookmark(&mut conn, "Quoting guide", None);

    // Unbalanced quotes and operators would be syntax errors if passed raw.
    let results = search::search_bookmarks(&conn, "\"quoting AND (guide", 10).unwrap();
    assert_eq!(results.len(), 1);
}

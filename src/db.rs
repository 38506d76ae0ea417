use std::path::Path;

use rusqlite::Connection;

use crate::error::{Error, Result};

/// Full store schema: source tables, link tables, and the three FTS5
/// projections. Everything is `IF NOT EXISTS` so opening an existing store
/// is a no-op. The FTS tables are keyed by rowid = source entity id and are
/// maintained explicitly by the `index` module, never by triggers.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS bookmarks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    url TEXT NOT NULL,
    description TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    description TEXT,
    is_predefined INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS tags (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    color TEXT
);

CREATE TABLE IF NOT EXISTS notes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    bookmark_id INTEGER NOT NULL REFERENCES bookmarks(id) ON DELETE CASCADE,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS code_snippets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    bookmark_id INTEGER NOT NULL REFERENCES bookmarks(id) ON DELETE CASCADE,
    language TEXT NOT NULL,
    code TEXT NOT NULL,
    description TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS bookmark_categories (
    bookmark_id INTEGER NOT NULL REFERENCES bookmarks(id) ON DELETE CASCADE,
    category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
    PRIMARY KEY (bookmark_id, category_id)
);

CREATE TABLE IF NOT EXISTS bookmark_tags (
    bookmark_id INTEGER NOT NULL REFERENCES bookmarks(id) ON DELETE CASCADE,
    tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
    PRIMARY KEY (bookmark_id, tag_id)
);

CREATE VIRTUAL TABLE IF NOT EXISTS bookmarks_fts USING fts5(title, description);
CREATE VIRTUAL TABLE IF NOT EXISTS notes_fts USING fts5(content);
CREATE VIRTUAL TABLE IF NOT EXISTS code_snippets_fts USING fts5(code, description, language);
";

/// Built-in research categories. Keyed on the unique name so reopening a
/// store never duplicates them.
const SEED_CATEGORIES: &str = "
INSERT OR IGNORE INTO categories (name, description, is_predefined) VALUES
    ('Web Security', 'OWASP, XSS, CSRF, injection and other web application flaws', 1),
    ('Cryptography', 'Ciphers, hashing, key management and protocol design', 1),
    ('API Security', 'Authentication, authorization and abuse of HTTP APIs', 1),
    ('Network Security', 'Scanning, firewalls, TLS and network protocol attacks', 1),
    ('Authentication', 'Passwords, MFA, SSO and session management', 1),
    ('Cloud Security', 'IAM, misconfiguration and provider hardening', 1),
    ('Reverse Engineering', 'Disassembly, debugging and binary analysis', 1),
    ('Secure Coding', 'Language-level pitfalls and defensive patterns', 1);
";

/// Open (or create) the bookmark store at `path` and apply the schema.
/// Foreign keys must be switched on per-connection; WAL keeps readers from
/// blocking the write path.
pub fn open(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| Error::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    let conn = Connection::open(path)?;
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;",
    )?;
    init_schema(&conn)?;
    tracing::debug!(path = %path.display(), "opened bookmark store");
    Ok(conn)
}

/// In-memory store with the full schema. Used by tests and throwaway runs.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    init_schema(&conn)?;
    Ok(conn)
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    conn.execute_batch(SEED_CATEGORIES)?;
    Ok(())
}

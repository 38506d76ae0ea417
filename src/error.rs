use std::path::PathBuf;

use thiserror::Error;

use crate::types::EntityKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Search query was empty or whitespace-only. Rejected before the index
    /// is touched; a client-side input error.
    #[error("search query cannot be empty")]
    EmptyQuery,

    /// Query text held no indexable terms (punctuation only). Surfaced as an
    /// error rather than an empty result set, which would be
    /// indistinguishable from "no matches".
    #[error("no searchable terms in query {query:?}")]
    InvalidQuery { query: String },

    /// A row written in the current transaction could not be read back, so
    /// the entity table and its index projection would disagree. The write
    /// fails; no repair is attempted.
    #[error("{kind} {id} vanished mid-transaction, index would go stale")]
    IndexInconsistency { kind: EntityKind, id: i64 },

    #[error("cannot create store directory {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Storage engine failure, propagated unchanged.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

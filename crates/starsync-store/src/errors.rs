//! Error types for the mirror store.

use thiserror::Error;

/// Result alias for store operations.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// Errors surfaced by the SQLite mirror store.
///
/// "Row not found" is deliberately not represented here — lookups return
/// `Ok(None)` because absence is the normal signal the reconciler branches on.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying SQLite failure (read or write).
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Could not obtain a pooled connection.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// A JSON column failed to serialize or parse.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored row no longer round-trips (e.g. hand-edited key column).
    #[error("corrupt row for key {key}: {detail}")]
    Corrupt {
        /// Canonical key text of the offending row.
        key: String,
        /// What failed to parse.
        detail: String,
    },
}

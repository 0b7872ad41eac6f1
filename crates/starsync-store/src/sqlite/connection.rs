//! Connection pooling for the mirror database.

use std::path::PathBuf;

use r2d2_sqlite::SqliteConnectionManager;

use crate::errors::Result;

/// Pool of SQLite connections to the mirror database file.
pub type ConnectionPool = r2d2::Pool<SqliteConnectionManager>;

/// A connection checked out of the pool.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Configuration for opening the mirror database.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Path to the database file.
    pub path: PathBuf,
    /// Maximum pooled connections.
    pub max_connections: u32,
}

impl ConnectionConfig {
    /// Config for a database at `path` with the default pool size.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_connections: 8,
        }
    }
}

/// Open a connection pool with WAL journaling and foreign keys enabled.
///
/// Every connection handed out has the pragmas applied; writers that collide
/// wait up to the busy timeout instead of failing immediately.
pub fn open_pool(config: &ConnectionConfig) -> Result<ConnectionPool> {
    let manager = SqliteConnectionManager::file(&config.path).with_init(|conn| {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )
    });
    let pool = r2d2::Pool::builder()
        .max_size(config.max_connections)
        .build(manager)?;
    Ok(pool)
}

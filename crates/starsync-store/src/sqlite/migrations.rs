//! Schema creation for the mirror database.

use rusqlite::Connection;

use crate::errors::Result;

/// Create the mirror schema if it does not exist yet.
///
/// Idempotent; safe to run on every startup. Entity keys are stored as their
/// canonical JSON text, so exact key equality is plain string equality at the
/// SQL level.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS systems (
            key            TEXT PRIMARY KEY,
            name           TEXT NOT NULL,
            x              REAL NOT NULL,
            y              REAL NOT NULL,
            z              REAL NOT NULL,
            require_permit INTEGER NOT NULL DEFAULT 0,
            information    TEXT NOT NULL,
            primary_star   TEXT NOT NULL,
            update_time    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS bodies (
            key         TEXT PRIMARY KEY,
            system_key  TEXT NOT NULL,
            attributes  TEXT NOT NULL,
            update_time TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_bodies_system_key ON bodies (system_key);

        CREATE TABLE IF NOT EXISTS sync_state (
            key            TEXT NOT NULL,
            kind           TEXT NOT NULL,
            sync_digest    TEXT NOT NULL,
            sync_date      TEXT NOT NULL,
            previous_state TEXT,
            PRIMARY KEY (key, kind)
        );",
    )?;
    Ok(())
}

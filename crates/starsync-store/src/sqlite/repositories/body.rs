//! Body repository — CRUD for the `bodies` table.
//!
//! A body belongs to exactly one system; `system_key` is set before the first
//! persist and carried through updates unchanged.

use rusqlite::{Connection, OptionalExtension, Row, params};

use starsync_core::{Body, EntityKey};

use crate::errors::Result;
use crate::sqlite::row_types::BodyRow;

fn row_to_body(row: &Row<'_>) -> rusqlite::Result<BodyRow> {
    Ok(BodyRow {
        key: row.get(0)?,
        system_key: row.get(1)?,
        attributes: row.get(2)?,
        update_time: row.get(3)?,
    })
}

/// Body repository — stateless, every method takes `&Connection`.
pub struct BodyRepo;

impl BodyRepo {
    /// Insert a new body row. Fails if the key already exists.
    pub fn create(conn: &Connection, body: &Body) -> Result<BodyRow> {
        let key = body.key.canonical_json();
        let system_key = body.system_key.canonical_json();
        let attributes = body.attributes.to_value().to_string();
        let now = chrono::Utc::now().to_rfc3339();
        let _ = conn.execute(
            "INSERT INTO bodies (key, system_key, attributes, update_time)
             VALUES (?1, ?2, ?3, ?4)",
            params![key, system_key, attributes, now],
        )?;
        Ok(BodyRow {
            key,
            system_key,
            attributes,
            update_time: now,
        })
    }

    /// Look up a body by key. Absence is `Ok(None)`.
    pub fn get_by_key(conn: &Connection, key: &EntityKey) -> Result<Option<BodyRow>> {
        let row = conn
            .query_row(
                "SELECT key, system_key, attributes, update_time FROM bodies WHERE key = ?1",
                params![key.canonical_json()],
                row_to_body,
            )
            .optional()?;
        Ok(row)
    }

    /// All bodies belonging to one system.
    pub fn list_by_system_key(conn: &Connection, system_key: &EntityKey) -> Result<Vec<BodyRow>> {
        let mut stmt = conn.prepare(
            "SELECT key, system_key, attributes, update_time FROM bodies
             WHERE system_key = ?1 ORDER BY key",
        )?;
        let rows = stmt
            .query_map(params![system_key.canonical_json()], row_to_body)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Overwrite the row for `body.key`. Returns `false` when no row exists.
    pub fn update_by_key(conn: &Connection, body: &Body) -> Result<bool> {
        let now = chrono::Utc::now().to_rfc3339();
        let changed = conn.execute(
            "UPDATE bodies SET system_key = ?2, attributes = ?3, update_time = ?4 WHERE key = ?1",
            params![
                body.key.canonical_json(),
                body.system_key.canonical_json(),
                body.attributes.to_value().to_string(),
                now
            ],
        )?;
        Ok(changed > 0)
    }

    /// Administrative delete. Returns `true` if a row was removed.
    pub fn delete_by_key(conn: &Connection, key: &EntityKey) -> Result<bool> {
        let changed = conn.execute(
            "DELETE FROM bodies WHERE key = ?1",
            params![key.canonical_json()],
        )?;
        Ok(changed > 0)
    }

    /// Count mirrored bodies.
    pub fn count(conn: &Connection) -> Result<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM bodies", [], |row| row.get(0))?;
        Ok(count)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

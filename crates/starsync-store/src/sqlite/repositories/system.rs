//! System repository — CRUD for the `systems` table.
//!
//! Rows are created on first discovery and updated on digest mismatch; the
//! crawler never deletes them. `delete_by_key` exists for out-of-core
//! administrative cleanup only.

use rusqlite::{Connection, OptionalExtension, Row, params};

use starsync_core::{EntityKey, System};

use crate::errors::Result;
use crate::sqlite::row_types::SystemRow;

fn row_to_system(row: &Row<'_>) -> rusqlite::Result<SystemRow> {
    Ok(SystemRow {
        key: row.get(0)?,
        name: row.get(1)?,
        x: row.get(2)?,
        y: row.get(3)?,
        z: row.get(4)?,
        require_permit: row.get(5)?,
        information: row.get(6)?,
        primary_star: row.get(7)?,
        update_time: row.get(8)?,
    })
}

const SELECT_COLUMNS: &str =
    "key, name, x, y, z, require_permit, information, primary_star, update_time";

/// System repository — stateless, every method takes `&Connection`.
pub struct SystemRepo;

impl SystemRepo {
    /// Insert a new system row. Fails if the key already exists.
    pub fn create(conn: &Connection, system: &System) -> Result<SystemRow> {
        let key = system.key.canonical_json();
        let information = system.information.to_value().to_string();
        let primary_star = system.primary_star.to_value().to_string();
        let now = chrono::Utc::now().to_rfc3339();
        let _ = conn.execute(
            "INSERT INTO systems (key, name, x, y, z, require_permit, information, primary_star, update_time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                key,
                system.name,
                system.coordinates.x,
                system.coordinates.y,
                system.coordinates.z,
                system.require_permit,
                information,
                primary_star,
                now
            ],
        )?;
        Ok(SystemRow {
            key,
            name: system.name.clone(),
            x: system.coordinates.x,
            y: system.coordinates.y,
            z: system.coordinates.z,
            require_permit: system.require_permit,
            information,
            primary_star,
            update_time: now,
        })
    }

    /// Look up a system by key. Absence is `Ok(None)`.
    pub fn get_by_key(conn: &Connection, key: &EntityKey) -> Result<Option<SystemRow>> {
        let row = conn
            .query_row(
                &format!("SELECT {SELECT_COLUMNS} FROM systems WHERE key = ?1"),
                params![key.canonical_json()],
                row_to_system,
            )
            .optional()?;
        Ok(row)
    }

    /// Overwrite the row for `system.key`. Returns `false` when no row exists.
    pub fn update_by_key(conn: &Connection, system: &System) -> Result<bool> {
        let now = chrono::Utc::now().to_rfc3339();
        let changed = conn.execute(
            "UPDATE systems
             SET name = ?2, x = ?3, y = ?4, z = ?5, require_permit = ?6,
                 information = ?7, primary_star = ?8, update_time = ?9
             WHERE key = ?1",
            params![
                system.key.canonical_json(),
                system.name,
                system.coordinates.x,
                system.coordinates.y,
                system.coordinates.z,
                system.require_permit,
                system.information.to_value().to_string(),
                system.primary_star.to_value().to_string(),
                now
            ],
        )?;
        Ok(changed > 0)
    }

    /// Administrative delete. Returns `true` if a row was removed.
    pub fn delete_by_key(conn: &Connection, key: &EntityKey) -> Result<bool> {
        let changed = conn.execute(
            "DELETE FROM systems WHERE key = ?1",
            params![key.canonical_json()],
        )?;
        Ok(changed > 0)
    }

    /// Count mirrored systems.
    pub fn count(conn: &Connection) -> Result<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM systems", [], |row| row.get(0))?;
        Ok(count)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

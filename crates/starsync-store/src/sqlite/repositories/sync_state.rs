//! Sync-state repository — CRUD for the `sync_state` table.
//!
//! One row per (key, kind) pair. A row exists iff the entity has been
//! successfully reconciled at least once; it is rewritten only when a digest
//! mismatch triggered an entity write, never on a no-op pass.

use rusqlite::{Connection, OptionalExtension, Row, params};

use starsync_core::{EntityKey, EntityKind, SyncState};

use crate::errors::Result;
use crate::sqlite::row_types::SyncStateRow;

fn row_to_sync_state(row: &Row<'_>) -> rusqlite::Result<SyncStateRow> {
    Ok(SyncStateRow {
        key: row.get(0)?,
        kind: row.get(1)?,
        sync_digest: row.get(2)?,
        sync_date: row.get(3)?,
        previous_state: row.get(4)?,
    })
}

/// Sync-state repository — stateless, every method takes `&Connection`.
pub struct SyncStateRepo;

impl SyncStateRepo {
    /// Look up the sync row for `(key, kind)`. Absence is `Ok(None)`.
    pub fn get(conn: &Connection, key: &EntityKey, kind: EntityKind) -> Result<Option<SyncStateRow>> {
        let row = conn
            .query_row(
                "SELECT key, kind, sync_digest, sync_date, previous_state
                 FROM sync_state WHERE key = ?1 AND kind = ?2",
                params![key.canonical_json(), kind.as_str()],
                row_to_sync_state,
            )
            .optional()?;
        Ok(row)
    }

    /// Insert a new sync row. Fails if `(key, kind)` already exists.
    pub fn create(conn: &Connection, state: &SyncState) -> Result<SyncStateRow> {
        let key = state.key.canonical_json();
        let previous = state
            .previous_state
            .as_ref()
            .map(std::string::ToString::to_string);
        let now = chrono::Utc::now().to_rfc3339();
        let _ = conn.execute(
            "INSERT INTO sync_state (key, kind, sync_digest, sync_date, previous_state)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![key, state.kind.as_str(), state.sync_digest, now, previous],
        )?;
        Ok(SyncStateRow {
            key,
            kind: state.kind.as_str().to_string(),
            sync_digest: state.sync_digest.clone(),
            sync_date: now,
            previous_state: previous,
        })
    }

    /// Overwrite the row for `(key, kind)`. Returns `false` when no row exists.
    pub fn update(conn: &Connection, state: &SyncState) -> Result<bool> {
        let now = chrono::Utc::now().to_rfc3339();
        let changed = conn.execute(
            "UPDATE sync_state
             SET sync_digest = ?3, sync_date = ?4, previous_state = ?5
             WHERE key = ?1 AND kind = ?2",
            params![
                state.key.canonical_json(),
                state.kind.as_str(),
                state.sync_digest,
                now,
                state
                    .previous_state
                    .as_ref()
                    .map(std::string::ToString::to_string)
            ],
        )?;
        Ok(changed > 0)
    }

    /// Administrative delete. Returns `true` if a row was removed.
    pub fn delete(conn: &Connection, key: &EntityKey, kind: EntityKind) -> Result<bool> {
        let changed = conn.execute(
            "DELETE FROM sync_state WHERE key = ?1 AND kind = ?2",
            params![key.canonical_json(), kind.as_str()],
        )?;
        Ok(changed > 0)
    }

    /// Count sync rows, across both kinds.
    pub fn count(conn: &Connection) -> Result<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM sync_state", [], |row| row.get(0))?;
        Ok(count)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use crate::sqlite::migrations::run_migrations;
    use serde_json::json;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn state(kind: EntityKind, digest: &str) -> SyncState {
        SyncState {
            key: EntityKey::new(27, 10),
            kind,
            sync_digest: digest.to_string(),
            previous_state: None,
        }
    }

    #[test]
    fn create_and_get() {
        let conn = setup();
        let created = SyncStateRepo::create(&conn, &state(EntityKind::System, "d1")).unwrap();
        assert_eq!(created.sync_digest, "d1");
        assert!(created.previous_state.is_none());

        let found = SyncStateRepo::get(&conn, &EntityKey::new(27, 10), EntityKind::System)
            .unwrap()
            .unwrap();
        assert_eq!(found, created);
    }

    #[test]
    fn key_and_kind_form_the_identity() {
        let conn = setup();
        SyncStateRepo::create(&conn, &state(EntityKind::System, "d1")).unwrap();
        // Same key, other kind: a distinct row.
        SyncStateRepo::create(&conn, &state(EntityKind::Body, "d2")).unwrap();

        assert_eq!(SyncStateRepo::count(&conn).unwrap(), 2);
        let body_row = SyncStateRepo::get(&conn, &EntityKey::new(27, 10), EntityKind::Body)
            .unwrap()
            .unwrap();
        assert_eq!(body_row.sync_digest, "d2");
        assert_eq!(body_row.entity_kind().unwrap(), EntityKind::Body);
    }

    #[test]
    fn duplicate_create_fails() {
        let conn = setup();
        SyncStateRepo::create(&conn, &state(EntityKind::System, "d1")).unwrap();
        assert!(SyncStateRepo::create(&conn, &state(EntityKind::System, "d1")).is_err());
    }

    #[test]
    fn update_replaces_digest_and_snapshot() {
        let conn = setup();
        let created = SyncStateRepo::create(&conn, &state(EntityKind::System, "d1")).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(5));
        let mut next = state(EntityKind::System, "d2");
        next.previous_state = Some(json!({"name": "before"}));
        assert!(SyncStateRepo::update(&conn, &next).unwrap());

        let found = SyncStateRepo::get(&conn, &next.key, EntityKind::System)
            .unwrap()
            .unwrap();
        assert_eq!(found.sync_digest, "d2");
        assert_ne!(found.sync_date, created.sync_date);
        assert_eq!(
            found.previous_state_value().unwrap().unwrap()["name"],
            "before"
        );
    }

    #[test]
    fn update_absent_returns_false() {
        let conn = setup();
        assert!(!SyncStateRepo::update(&conn, &state(EntityKind::System, "d1")).unwrap());
    }

    #[test]
    fn delete_by_key_and_kind() {
        let conn = setup();
        SyncStateRepo::create(&conn, &state(EntityKind::System, "d1")).unwrap();
        SyncStateRepo::create(&conn, &state(EntityKind::Body, "d2")).unwrap();

        assert!(SyncStateRepo::delete(&conn, &EntityKey::new(27, 10), EntityKind::System).unwrap());
        assert_eq!(SyncStateRepo::count(&conn).unwrap(), 1);
    }
}

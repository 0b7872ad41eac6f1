//! Pooled facade over the mirror repositories.
//!
//! Each method checks one connection out of the pool and runs exactly one
//! statement. The store makes no cross-call transaction promises: the
//! reconciler's sync-state read and the subsequent entity/sync writes are
//! separate calls, and the benign race where two workers detect the same
//! change and both write is tolerated as eventually consistent.

use tracing::debug;

use starsync_core::{Body, EntityKey, EntityKind, SyncState, System};

use crate::errors::Result;
use crate::sqlite::connection::{ConnectionConfig, ConnectionPool, PooledConnection, open_pool};
use crate::sqlite::migrations::run_migrations;
use crate::sqlite::repositories::body::BodyRepo;
use crate::sqlite::repositories::sync_state::SyncStateRepo;
use crate::sqlite::repositories::system::SystemRepo;
use crate::sqlite::row_types::{BodyRow, SyncStateRow, SystemRow};

/// The mirror store used by the reconciler and the crawler.
pub struct MirrorStore {
    pool: ConnectionPool,
}

impl MirrorStore {
    /// Wrap an already-opened pool.
    #[must_use]
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    /// Open the database at `config.path` and ensure the schema exists.
    pub fn open(config: &ConnectionConfig) -> Result<Self> {
        let pool = open_pool(config)?;
        let conn = pool.get()?;
        run_migrations(&conn)?;
        debug!(path = %config.path.display(), "mirror store opened");
        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConnection> {
        Ok(self.pool.get()?)
    }

    // ── Systems ──────────────────────────────────────────────────────────

    /// Look up a system by key.
    pub fn system(&self, key: &EntityKey) -> Result<Option<SystemRow>> {
        let conn = self.conn()?;
        SystemRepo::get_by_key(&conn, key)
    }

    /// Persist a newly discovered system.
    pub fn create_system(&self, system: &System) -> Result<SystemRow> {
        let conn = self.conn()?;
        SystemRepo::create(&conn, system)
    }

    /// Overwrite a mirrored system.
    pub fn update_system(&self, system: &System) -> Result<bool> {
        let conn = self.conn()?;
        SystemRepo::update_by_key(&conn, system)
    }

    /// Administrative delete of a system row.
    pub fn delete_system(&self, key: &EntityKey) -> Result<bool> {
        let conn = self.conn()?;
        SystemRepo::delete_by_key(&conn, key)
    }

    /// Count mirrored systems.
    pub fn system_count(&self) -> Result<i64> {
        let conn = self.conn()?;
        SystemRepo::count(&conn)
    }

    // ── Bodies ───────────────────────────────────────────────────────────

    /// Look up a body by key.
    pub fn body(&self, key: &EntityKey) -> Result<Option<BodyRow>> {
        let conn = self.conn()?;
        BodyRepo::get_by_key(&conn, key)
    }

    /// All bodies mirrored under one system.
    pub fn bodies_for_system(&self, system_key: &EntityKey) -> Result<Vec<BodyRow>> {
        let conn = self.conn()?;
        BodyRepo::list_by_system_key(&conn, system_key)
    }

    /// Persist a newly discovered body.
    pub fn create_body(&self, body: &Body) -> Result<BodyRow> {
        let conn = self.conn()?;
        BodyRepo::create(&conn, body)
    }

    /// Overwrite a mirrored body.
    pub fn update_body(&self, body: &Body) -> Result<bool> {
        let conn = self.conn()?;
        BodyRepo::update_by_key(&conn, body)
    }

    /// Administrative delete of a body row.
    pub fn delete_body(&self, key: &EntityKey) -> Result<bool> {
        let conn = self.conn()?;
        BodyRepo::delete_by_key(&conn, key)
    }

    /// Count mirrored bodies.
    pub fn body_count(&self) -> Result<i64> {
        let conn = self.conn()?;
        BodyRepo::count(&conn)
    }

    // ── Sync state ───────────────────────────────────────────────────────

    /// Look up the sync row for `(key, kind)`.
    pub fn sync_state(&self, key: &EntityKey, kind: EntityKind) -> Result<Option<SyncStateRow>> {
        let conn = self.conn()?;
        SyncStateRepo::get(&conn, key, kind)
    }

    /// Record a first successful reconciliation.
    pub fn create_sync_state(&self, state: &SyncState) -> Result<SyncStateRow> {
        let conn = self.conn()?;
        SyncStateRepo::create(&conn, state)
    }

    /// Rewrite the sync row after a digest mismatch.
    pub fn update_sync_state(&self, state: &SyncState) -> Result<bool> {
        let conn = self.conn()?;
        SyncStateRepo::update(&conn, state)
    }

    /// Administrative delete of a sync row.
    pub fn delete_sync_state(&self, key: &EntityKey, kind: EntityKind) -> Result<bool> {
        let conn = self.conn()?;
        SyncStateRepo::delete(&conn, key, kind)
    }

    /// Count sync rows.
    pub fn sync_state_count(&self) -> Result<i64> {
        let conn = self.conn()?;
        SyncStateRepo::count(&conn)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

//! Hash-based reconciliation of remote records against the mirror.
//!
//! The digest comparison is the single gate for all writes: entity and
//! sync-state rows are touched only when the remote record's content digest
//! differs from the one stored at the last reconciliation. This bounds write
//! volume to actual remote-side change, not to call frequency.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use starsync_core::{Body, Document, EntityKey, EntityKind, SyncState, System, hash};
use starsync_store::MirrorStore;

use crate::errors::Result;

/// What a reconciliation pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// First sighting: entity and sync rows were created.
    Created,
    /// Digest mismatch: entity rewritten, sync row updated with a snapshot.
    Updated,
    /// Digest match: nothing written.
    Unchanged,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
        })
    }
}

/// Decides create/update/no-op for one entity at a time.
#[derive(Clone)]
pub struct Reconciler {
    store: Arc<MirrorStore>,
}

impl Reconciler {
    /// Reconciler writing to `store`.
    #[must_use]
    pub fn new(store: Arc<MirrorStore>) -> Self {
        Self { store }
    }

    /// Reconcile a system record. The key is taken from the record itself.
    pub fn reconcile_system(&self, record: &Document) -> Result<Outcome> {
        let system = System::from_remote(record)?;
        let key = system.key;

        let Some(state) = self.store.sync_state(&key, EntityKind::System)? else {
            let _ = self.store.create_system(&system)?;
            let _ = self.store.create_sync_state(&SyncState {
                key,
                kind: EntityKind::System,
                sync_digest: hash::digest(record),
                previous_state: None,
            })?;
            info!(key = %key, name = %system.name, "system created");
            return Ok(Outcome::Created);
        };

        let digest = hash::digest(record);
        if digest == state.sync_digest {
            debug!(key = %key, "system unchanged");
            return Ok(Outcome::Unchanged);
        }

        // The row may have been deleted out-of-band; that only means there is
        // no prior snapshot to capture.
        let previous = self.store.system(&key)?;
        let snapshot = previous.as_ref().map(starsync_store::SystemRow::snapshot).transpose()?;
        if previous.is_some() {
            let _ = self.store.update_system(&system)?;
        } else {
            let _ = self.store.create_system(&system)?;
        }
        let _ = self.store.update_sync_state(&SyncState {
            key,
            kind: EntityKind::System,
            sync_digest: digest,
            previous_state: snapshot,
        })?;
        info!(key = %key, name = %system.name, "system updated");
        Ok(Outcome::Updated)
    }

    /// Reconcile a body record under its parent system's key.
    ///
    /// The parent must already have been reconciled (or be mid-reconciliation
    /// on the same worker): within one worker the System-then-Bodies order is
    /// fixed.
    pub fn reconcile_body(&self, system_key: EntityKey, record: &Document) -> Result<Outcome> {
        let body = Body::from_remote(record, system_key)?;
        let key = body.key;

        let Some(state) = self.store.sync_state(&key, EntityKind::Body)? else {
            let _ = self.store.create_body(&body)?;
            let _ = self.store.create_sync_state(&SyncState {
                key,
                kind: EntityKind::Body,
                sync_digest: hash::digest(record),
                previous_state: None,
            })?;
            debug!(key = %key, system = %system_key, "body created");
            return Ok(Outcome::Created);
        };

        let digest = hash::digest(record);
        if digest == state.sync_digest {
            debug!(key = %key, "body unchanged");
            return Ok(Outcome::Unchanged);
        }

        let previous = self.store.body(&key)?;
        let snapshot = previous.as_ref().map(starsync_store::BodyRow::snapshot).transpose()?;
        if previous.is_some() {
            let _ = self.store.update_body(&body)?;
        } else {
            let _ = self.store.create_body(&body)?;
        }
        let _ = self.store.update_sync_state(&SyncState {
            key,
            kind: EntityKind::Body,
            sync_digest: digest,
            previous_state: snapshot,
        })?;
        debug!(key = %key, system = %system_key, "body updated");
        Ok(Outcome::Updated)
    }

    /// Whether `(key, kind)` has ever been successfully reconciled.
    pub fn already_synced(&self, key: &EntityKey, kind: EntityKind) -> Result<bool> {
        Ok(self.store.sync_state(key, kind)?.is_some())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

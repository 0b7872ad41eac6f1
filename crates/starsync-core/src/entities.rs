//! Mirrored entity types.
//!
//! [`System`] and [`Body`] are the write-side shapes handed to the store; the
//! store stamps `update_time` on every write and returns its own row types on
//! reads. [`SyncState`] is the reconciliation bookkeeping attached to each
//! entity: the digest of the last-seen remote record, and the pre-update
//! snapshot captured when a change was last detected.

use serde_json::Value;

use crate::coordinate::Coordinate;
use crate::document::Document;
use crate::errors::{CoreError, Result};
use crate::ids::{EntityKey, EntityKind};

/// A star system as mirrored from the remote catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct System {
    /// Composite identity.
    pub key: EntityKey,
    /// Display name.
    pub name: String,
    /// Position in catalog space.
    pub coordinates: Coordinate,
    /// Whether entry requires a permit.
    pub require_permit: bool,
    /// Open map of remote-supplied system attributes.
    pub information: Document,
    /// Open map describing the primary star.
    pub primary_star: Document,
}

impl System {
    /// Build a system from a raw remote record.
    ///
    /// `id`, `id64`, `name` and `coords` must be present; `requirePermit`,
    /// `information` and `primaryStar` default to absent/false, which is how
    /// the remote encodes them for unremarkable systems.
    pub fn from_remote(record: &Document) -> Result<Self> {
        let key = record.entity_key()?;
        let name = record
            .str_field("name")
            .ok_or(CoreError::missing("name"))?
            .to_string();
        let coordinates = Coordinate::from_record(record)?;
        Ok(Self {
            key,
            name,
            coordinates,
            require_permit: record.bool_field("requirePermit").unwrap_or(false),
            information: record.object_field("information").unwrap_or_default(),
            primary_star: record.object_field("primaryStar").unwrap_or_default(),
        })
    }
}

/// An orbital body belonging to exactly one system.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Composite identity.
    pub key: EntityKey,
    /// Key of the owning system. Set before the first persist.
    pub system_key: EntityKey,
    /// The full remote record, kept opaque.
    pub attributes: Document,
}

impl Body {
    /// Build a body from a raw remote record and its parent system's key.
    pub fn from_remote(record: &Document, system_key: EntityKey) -> Result<Self> {
        Ok(Self {
            key: record.entity_key()?,
            system_key,
            attributes: record.clone(),
        })
    }
}

/// Reconciliation bookkeeping for one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncState {
    /// Key of the entity this row tracks.
    pub key: EntityKey,
    /// Which kind of entity.
    pub kind: EntityKind,
    /// Content digest of the remote record as of the last reconciliation.
    pub sync_digest: String,
    /// Entity state immediately before the most recent update, if the last
    /// reconciliation changed anything and a prior row existed.
    pub previous_state: Option<Value>,
}

//! Row types returned by the repositories.
//!
//! Rows carry columns as stored (canonical key JSON, RFC 3339 timestamps,
//! JSON text for the open maps). Typed conversions back to core types are
//! provided where the reconciler needs them; the `snapshot` methods render a
//! row as the JSON value captured into `sync_state.previous_state` when a
//! change is detected.

use serde_json::{Value, json};

use starsync_core::{EntityKey, EntityKind};

use crate::errors::{Result, StoreError};

fn parse_json(raw: &str, key: &str, column: &str) -> Result<Value> {
    serde_json::from_str(raw).map_err(|e| StoreError::Corrupt {
        key: key.to_string(),
        detail: format!("bad JSON in column `{column}`: {e}"),
    })
}

/// A `systems` row as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemRow {
    /// Canonical key JSON.
    pub key: String,
    /// Display name.
    pub name: String,
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
    /// Whether entry requires a permit.
    pub require_permit: bool,
    /// `information` open map, JSON text.
    pub information: String,
    /// `primaryStar` open map, JSON text.
    pub primary_star: String,
    /// RFC 3339, assigned by the store on every write.
    pub update_time: String,
}

impl SystemRow {
    /// The row's key, parsed back to its typed form.
    pub fn entity_key(&self) -> Result<EntityKey> {
        EntityKey::from_canonical_json(&self.key).map_err(|e| StoreError::Corrupt {
            key: self.key.clone(),
            detail: format!("bad key column: {e}"),
        })
    }

    /// Render the row as the snapshot value stored in `previous_state`.
    pub fn snapshot(&self) -> Result<Value> {
        Ok(json!({
            "key": parse_json(&self.key, &self.key, "key")?,
            "name": self.name,
            "coordinates": {"x": self.x, "y": self.y, "z": self.z},
            "require_permit": self.require_permit,
            "information": parse_json(&self.information, &self.key, "information")?,
            "primary_star": parse_json(&self.primary_star, &self.key, "primary_star")?,
            "update_time": self.update_time,
        }))
    }
}

/// A `bodies` row as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyRow {
    /// Canonical key JSON.
    pub key: String,
    /// Canonical key JSON of the owning system.
    pub system_key: String,
    /// Full remote record, JSON text.
    pub attributes: String,
    /// RFC 3339, assigned by the store on every write.
    pub update_time: String,
}

impl BodyRow {
    /// The row's key, parsed back to its typed form.
    pub fn entity_key(&self) -> Result<EntityKey> {
        EntityKey::from_canonical_json(&self.key).map_err(|e| StoreError::Corrupt {
            key: self.key.clone(),
            detail: format!("bad key column: {e}"),
        })
    }

    /// Render the row as the snapshot value stored in `previous_state`.
    pub fn snapshot(&self) -> Result<Value> {
        Ok(json!({
            "key": parse_json(&self.key, &self.key, "key")?,
            "system_key": parse_json(&self.system_key, &self.key, "system_key")?,
            "attributes": parse_json(&self.attributes, &self.key, "attributes")?,
            "update_time": self.update_time,
        }))
    }
}

/// A `sync_state` row as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncStateRow {
    /// Canonical key JSON of the tracked entity.
    pub key: String,
    /// Entity kind column (`system` | `body`).
    pub kind: String,
    /// Hex SHA-256 of the last-seen remote record.
    pub sync_digest: String,
    /// RFC 3339 time of the last reconciliation that wrote.
    pub sync_date: String,
    /// Pre-update snapshot JSON text, if any.
    pub previous_state: Option<String>,
}

impl SyncStateRow {
    /// The row's kind, parsed back to its typed form.
    pub fn entity_kind(&self) -> Result<EntityKind> {
        EntityKind::parse(&self.kind).map_err(|e| StoreError::Corrupt {
            key: self.key.clone(),
            detail: e.to_string(),
        })
    }

    /// The stored snapshot as a JSON value, if any.
    pub fn previous_state_value(&self) -> Result<Option<Value>> {
        self.previous_state
            .as_deref()
            .map(|raw| parse_json(raw, &self.key, "previous_state"))
            .transpose()
    }
}

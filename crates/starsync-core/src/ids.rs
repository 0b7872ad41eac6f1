//! Composite entity keys and entity kinds.
//!
//! Every mirrored record — star system or orbital body — is identified by the
//! pair `(id, id64)` assigned by the remote catalog. Equality is exact on both
//! fields; keys are never partially matched and never reassigned.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Composite identity for a [`System`](crate::entities::System) or
/// [`Body`](crate::entities::Body).
///
/// Field order matters: [`EntityKey::canonical_json`] relies on the declared
/// order so the same key always renders to the same string, which is what the
/// store uses as its TEXT primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityKey {
    /// Short remote identifier.
    pub id: i64,
    /// 64-bit remote identifier.
    pub id64: i64,
}

impl EntityKey {
    /// Create a key from its two parts.
    #[must_use]
    pub fn new(id: i64, id64: i64) -> Self {
        Self { id, id64 }
    }

    /// Canonical JSON rendering, e.g. `{"id":42,"id64":9000}`.
    ///
    /// Used verbatim as the primary-key column in the store.
    #[must_use]
    pub fn canonical_json(&self) -> String {
        format!(r#"{{"id":{},"id64":{}}}"#, self.id, self.id64)
    }

    /// Parse a key previously rendered with [`EntityKey::canonical_json`].
    pub fn from_canonical_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.id, self.id64)
    }
}

/// The two kinds of mirrored entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A star system.
    System,
    /// An orbital body belonging to a system.
    Body,
}

impl EntityKind {
    /// Stable string form, matching the `kind` column in the store.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Body => "body",
        }
    }

    /// Parse the stable string form back into a kind.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw {
            "system" => Ok(Self::System),
            "body" => Ok(Self::Body),
            other => Err(CoreError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_json_is_stable() {
        let key = EntityKey::new(42, 9_000_000_000);
        assert_eq!(key.canonical_json(), r#"{"id":42,"id64":9000000000}"#);
    }

    #[test]
    fn canonical_json_round_trips() {
        let key = EntityKey::new(7, -3);
        let parsed = EntityKey::from_canonical_json(&key.canonical_json()).unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn keys_compare_on_both_fields() {
        assert_ne!(EntityKey::new(1, 2), EntityKey::new(1, 3));
        assert_ne!(EntityKey::new(1, 2), EntityKey::new(2, 2));
        assert_eq!(EntityKey::new(1, 2), EntityKey::new(1, 2));
    }

    #[test]
    fn kind_round_trips() {
        assert_eq!(EntityKind::parse("system").unwrap(), EntityKind::System);
        assert_eq!(EntityKind::parse("body").unwrap(), EntityKind::Body);
        assert!(EntityKind::parse("planet").is_err());
    }
}

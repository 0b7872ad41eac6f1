//! Error types for starsync-core.

use thiserror::Error;

/// Result alias for core operations.
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

/// Errors raised while interpreting remote records.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A record is missing a field the mirror cannot do without.
    #[error("record is missing required field `{field}`")]
    MissingField {
        /// Name of the absent field.
        field: &'static str,
    },

    /// A field is present but has the wrong shape.
    #[error("field `{field}` has unexpected type (expected {expected})")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// What the mirror expected to find.
        expected: &'static str,
    },

    /// An entity kind string stored outside this process is unknown.
    #[error("unknown entity kind `{0}`")]
    UnknownKind(String),
}

impl CoreError {
    /// Shorthand for a missing-field error.
    #[must_use]
    pub fn missing(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Shorthand for a wrong-shape error.
    #[must_use]
    pub fn invalid(field: &'static str, expected: &'static str) -> Self {
        Self::InvalidField { field, expected }
    }
}

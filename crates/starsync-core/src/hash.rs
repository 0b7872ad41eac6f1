//! Canonical content hashing for change detection.
//!
//! The reconciler decides create/update/no-op by comparing the digest of the
//! record the remote just returned against the digest stored at the last
//! reconciliation. That only works if equivalent records always hash the
//! same, so the record is serialized in a canonical form first: object keys
//! sorted recursively, compact separators, no insertion-order leakage.

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::document::Document;

/// Deterministic SHA-256 digest of a remote record, as lowercase hex.
///
/// Pure function of the record's content. Two documents that are equal as
/// maps produce the same digest regardless of key insertion order, across
/// process restarts.
#[must_use]
pub fn digest(record: &Document) -> String {
    let mut canonical = String::new();
    write_canonical(&Value::Object(record.0.clone()), &mut canonical);
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Serialize `value` into `out` with recursively sorted object keys.
fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // Object keys are strings; serde_json renders their escaping.
                out.push_str(&Value::String((*key).clone()).to_string());
                out.push(':');
                write_canonical(&map[*key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        // Scalars already have a single canonical JSON rendering.
        scalar => out.push_str(&scalar.to_string()),
    }
}

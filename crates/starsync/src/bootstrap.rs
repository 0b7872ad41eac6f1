//! Bootstrap file loading.
//!
//! The remote's nightly dumps are line-delimited JSON, one record per line.
//! Only the `(id, id64)` pair is consumed here; a malformed line is skipped
//! with a warning, never fatal to the batch.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use starsync_core::{Document, EntityKey};

/// Read all entity keys out of a line-delimited JSON dump.
pub fn read_keys(path: &Path) -> Result<Vec<EntityKey>> {
    let file = File::open(path)
        .with_context(|| format!("opening bootstrap file {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut keys = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let number = index + 1;
        let line = line.with_context(|| format!("reading line {number}"))?;
        if line.trim().is_empty() {
            continue;
        }
        let key = serde_json::from_str::<serde_json::Value>(&line)
            .ok()
            .and_then(|value| Document::from_value(value).ok())
            .and_then(|record| record.entity_key().ok());
        match key {
            Some(key) => keys.push(key),
            None => warn!(line = number, "skipping malformed bootstrap line"),
        }
        if number % 100 == 0 {
            debug!(lines = number, "reading bootstrap file");
        }
    }
    Ok(keys)
}

//! Outcome counters shared across crawl workers.

use std::sync::atomic::{AtomicU64, Ordering};

use starsync_core::EntityKind;

use crate::reconcile::Outcome;

/// Lock-free counters updated by every worker of a crawl run.
#[derive(Debug, Default)]
pub struct CrawlStats {
    systems_created: AtomicU64,
    systems_updated: AtomicU64,
    systems_unchanged: AtomicU64,
    bodies_created: AtomicU64,
    bodies_updated: AtomicU64,
    bodies_unchanged: AtomicU64,
    regions_scanned: AtomicU64,
    failures: AtomicU64,
}

impl CrawlStats {
    /// Record a reconciliation outcome for an entity of `kind`.
    pub fn record(&self, kind: EntityKind, outcome: Outcome) {
        let counter = match (kind, outcome) {
            (EntityKind::System, Outcome::Created) => &self.systems_created,
            (EntityKind::System, Outcome::Updated) => &self.systems_updated,
            (EntityKind::System, Outcome::Unchanged) => &self.systems_unchanged,
            (EntityKind::Body, Outcome::Created) => &self.bodies_created,
            (EntityKind::Body, Outcome::Updated) => &self.bodies_updated,
            (EntityKind::Body, Outcome::Unchanged) => &self.bodies_unchanged,
        };
        let _ = counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one region scan.
    pub fn record_region(&self) {
        let _ = self.regions_scanned.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one contained failure.
    pub fn record_failure(&self) {
        let _ = self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot the counters.
    #[must_use]
    pub fn report(&self) -> CrawlReport {
        CrawlReport {
            systems_created: self.systems_created.load(Ordering::Relaxed),
            systems_updated: self.systems_updated.load(Ordering::Relaxed),
            systems_unchanged: self.systems_unchanged.load(Ordering::Relaxed),
            bodies_created: self.bodies_created.load(Ordering::Relaxed),
            bodies_updated: self.bodies_updated.load(Ordering::Relaxed),
            bodies_unchanged: self.bodies_unchanged.load(Ordering::Relaxed),
            regions_scanned: self.regions_scanned.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time summary of a crawl run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Systems persisted for the first time.
    pub systems_created: u64,
    /// Systems rewritten after a digest mismatch.
    pub systems_updated: u64,
    /// Systems whose digest matched (no writes).
    pub systems_unchanged: u64,
    /// Bodies persisted for the first time.
    pub bodies_created: u64,
    /// Bodies rewritten after a digest mismatch.
    pub bodies_updated: u64,
    /// Bodies whose digest matched (no writes).
    pub bodies_unchanged: u64,
    /// Distinct region centers scanned.
    pub regions_scanned: u64,
    /// Contained per-entity or per-region failures.
    pub failures: u64,
}

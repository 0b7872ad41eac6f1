//! Recursive, concurrent discovery over 3D space.
//!
//! One crawl run shares two registries across all workers: the set of entity
//! keys already reconciled and the set of coordinate triples already used as
//! a scan center. Both are claimed with an atomic check-and-insert — two
//! workers racing past a "not visited" check would duplicate work, and for
//! regions that duplication compounds into runaway recursive growth.
//!
//! Fan-out is one spawned task per newly claimed sub-region, joined before
//! the parent region returns. There is no bound on in-flight scans; the
//! optional cancellation token is consulted before each spawn so an external
//! owner can stop the fan-out from growing.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::BoxFuture;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use starsync_client::CatalogClient;
use starsync_core::{Coordinate, Document, EntityKey, EntityKind};
use starsync_store::MirrorStore;

use crate::errors::Result;
use crate::reconcile::Reconciler;
use crate::stats::{CrawlReport, CrawlStats};

/// Tuning knobs for a crawl run.
#[derive(Debug, Clone, Copy)]
pub struct CrawlerConfig {
    /// Half-width of each cube query.
    pub radius: f64,
    /// Inner margin of a region; only systems outside `radius - overlap_margin`
    /// from the center open a new region.
    pub overlap_margin: f64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            radius: 100.0,
            overlap_margin: 10.0,
        }
    }
}

/// The crawl orchestrator.
///
/// Cloning is cheap and shares the visited registries and counters, which is
/// how worker tasks see one coherent crawl run. Construct a fresh crawler per
/// run: the registries are scoped to this value's lifetime.
#[derive(Clone)]
pub struct SpatialCrawler {
    client: Arc<CatalogClient>,
    reconciler: Reconciler,
    config: CrawlerConfig,
    cancel: CancellationToken,
    visited_entities: Arc<Mutex<HashSet<EntityKey>>>,
    visited_regions: Arc<Mutex<HashSet<(u64, u64, u64)>>>,
    stats: Arc<CrawlStats>,
}

impl SpatialCrawler {
    /// Crawler with the default radius and margin.
    #[must_use]
    pub fn new(client: Arc<CatalogClient>, store: Arc<MirrorStore>) -> Self {
        Self::with_config(client, store, CrawlerConfig::default(), CancellationToken::new())
    }

    /// Crawler with explicit config and an externally owned cancellation
    /// token. Cancelling stops new sub-scans from spawning; in-flight region
    /// scans run to completion.
    #[must_use]
    pub fn with_config(
        client: Arc<CatalogClient>,
        store: Arc<MirrorStore>,
        config: CrawlerConfig,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            client,
            reconciler: Reconciler::new(store),
            config,
            cancel,
            visited_entities: Arc::new(Mutex::new(HashSet::new())),
            visited_regions: Arc::new(Mutex::new(HashSet::new())),
            stats: Arc::new(CrawlStats::default()),
        }
    }

    /// Exhaustively crawl outward from `origin`, returning once the whole
    /// fan-out has completed.
    #[instrument(skip(self))]
    pub async fn full_scan(&self, origin: Coordinate) -> CrawlReport {
        info!(%origin, radius = self.config.radius, "starting full scan");
        let _ = self.claim_region(&origin);
        self.clone().scan(origin, self.config.radius).await;
        let report = self.stats.report();
        info!(?report, "full scan complete");
        report
    }

    /// Bulk path used by the bootstrap loader: reconcile each key only if no
    /// sync state exists for it yet, without walking space.
    #[instrument(skip_all, fields(keys = keys.len()))]
    pub async fn refresh_known_list(&self, keys: &[EntityKey]) -> CrawlReport {
        for key in keys {
            match self.reconciler.already_synced(key, EntityKind::System) {
                Ok(true) => {
                    debug!(key = %key, "already synced, skipping");
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    error!(key = %key, error = %e, "sync-state lookup failed");
                    self.stats.record_failure();
                    continue;
                }
            }
            if let Err(e) = self.refresh_system(*key).await {
                error!(key = %key, error = %e, "system refresh failed");
                self.stats.record_failure();
            }
        }
        let report = self.stats.report();
        info!(?report, "known-list refresh complete");
        report
    }

    /// Fetch one system by id and reconcile it together with its bodies.
    pub async fn refresh_system(&self, key: EntityKey) -> Result<()> {
        let record = self.client.system_by_id(key.id).await?;
        self.process_system(key, &record).await
    }

    /// Recursive region scan. Regions are claimed by the caller before the
    /// task is spawned, so each center is scanned exactly once per run.
    fn scan(self, center: Coordinate, radius: f64) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            self.stats.record_region();

            let systems = match self.client.systems_in_cube(&center, radius).await {
                Ok(systems) => systems,
                Err(e) => {
                    error!(%center, error = %e, "region query failed");
                    self.stats.record_failure();
                    return;
                }
            };
            info!(%center, systems = systems.len(), "processing region");

            let mut sub_scans: Vec<JoinHandle<()>> = Vec::new();
            for record in systems {
                let key = match record.entity_key() {
                    Ok(key) => key,
                    Err(e) => {
                        warn!(error = %e, "skipping record without a usable key");
                        self.stats.record_failure();
                        continue;
                    }
                };

                if self.claim_entity(key) {
                    if let Err(e) = self.process_system(key, &record).await {
                        error!(key = %key, error = %e, "system reconciliation failed");
                        self.stats.record_failure();
                    }
                } else {
                    debug!(key = %key, "already handled in this run, skipping");
                }

                if let Some(handle) = self.consider_sub_scan(&record, &center, radius) {
                    sub_scans.push(handle);
                }
            }

            debug!(%center, spawned = sub_scans.len(), "joining sub-scans");
            for handle in sub_scans {
                if let Err(e) = handle.await {
                    error!(error = %e, "sub-scan task failed");
                    self.stats.record_failure();
                }
            }
        })
    }

    /// Spawn a scan centered on this system's coordinate if it sits outside
    /// the current region's inner margin and its region is still unclaimed.
    fn consider_sub_scan(
        &self,
        record: &Document,
        center: &Coordinate,
        radius: f64,
    ) -> Option<JoinHandle<()>> {
        // Systems without coordinates cannot seed a region.
        let coords = Coordinate::from_record(record).ok()?;
        if !coords.outside_margin(center, radius - self.config.overlap_margin) {
            return None;
        }
        if self.cancel.is_cancelled() {
            debug!("cancellation requested, not spawning further scans");
            return None;
        }
        if !self.claim_region(&coords) {
            debug!(%coords, "region already scanned, skipping");
            return None;
        }
        debug!(%coords, "spawning sub-scan");
        Some(tokio::spawn(self.clone().scan(coords, radius)))
    }

    /// Reconcile a system record, then every body under it.
    ///
    /// Bodies are only touched after the system reconciled: an empty system
    /// record short-circuits the whole step so no body ever precedes its
    /// parent. Per-body failures are contained here; siblings still run.
    async fn process_system(&self, key: EntityKey, record: &Document) -> Result<()> {
        if record.is_empty() {
            debug!(key = %key, "remote has no record for this system");
            return Ok(());
        }

        let outcome = self.reconciler.reconcile_system(record)?;
        self.stats.record(EntityKind::System, outcome);

        let bodies = self.client.bodies_by_system_id(key.id).await?;
        if !bodies.is_empty() {
            debug!(key = %key, bodies = bodies.len(), "processing bodies");
        }
        for body in &bodies {
            match self.reconciler.reconcile_body(key, body) {
                Ok(outcome) => self.stats.record(EntityKind::Body, outcome),
                Err(e) => {
                    error!(system = %key, error = %e, "body reconciliation failed");
                    self.stats.record_failure();
                }
            }
        }
        Ok(())
    }

    /// Check-and-insert on the visited-entity registry.
    fn claim_entity(&self, key: EntityKey) -> bool {
        self.visited_entities.lock().insert(key)
    }

    /// Check-and-insert on the visited-region registry (bit-exact centers).
    fn claim_region(&self, center: &Coordinate) -> bool {
        self.visited_regions.lock().insert(center.region_key())
    }

    /// Counters so far; final numbers come from the entry points' reports.
    #[must_use]
    pub fn report(&self) -> CrawlReport {
        self.stats.report()
    }
}

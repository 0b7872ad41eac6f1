//! # starsync-crawler
//!
//! The crawl-and-reconcile engine of the starsync mirror.
//!
//! - [`reconcile::Reconciler`] — decides create/update/no-op for one entity
//!   by comparing content digests against the stored sync state, capturing
//!   the prior row as an audit snapshot when a change is detected.
//! - [`crawler::SpatialCrawler`] — recursive, concurrent discovery over 3D
//!   space: cube queries fan out into sub-scans around edge systems, with
//!   shared visited registries preventing duplicate regions and duplicate
//!   entity reconciliation within a run.
//! - [`stats::CrawlStats`] — outcome counters aggregated across workers.

#![deny(unsafe_code)]

pub mod crawler;
pub mod errors;
pub mod reconcile;
pub mod stats;

pub use crawler::{CrawlerConfig, SpatialCrawler};
pub use errors::{CrawlError, Result};
pub use reconcile::{Outcome, Reconciler};
pub use stats::{CrawlReport, CrawlStats};

//! Error types for the crawl engine.

use thiserror::Error;

/// Result alias for crawl operations.
pub type Result<T, E = CrawlError> = std::result::Result<T, E>;

/// Errors raised while reconciling one entity or scanning one region.
///
/// These never unwind the crawl: the scan loop catches them at per-system /
/// per-body granularity, logs the offending key and continues with siblings.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Remote catalog call failed.
    #[error(transparent)]
    Client(#[from] starsync_client::ClientError),

    /// Mirror store read or write failed.
    #[error(transparent)]
    Store(#[from] starsync_store::StoreError),

    /// The remote record could not be interpreted.
    #[error(transparent)]
    Record(#[from] starsync_core::CoreError),
}

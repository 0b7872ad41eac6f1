//! # starsync-client
//!
//! Read-only HTTP client for the remote astronomical catalog.
//!
//! [`CatalogClient`] exposes the three reads the mirror needs — system by
//! id (or name), bodies by system id, and systems within a coordinate cube —
//! behind a [`RateLimiter`] that enforces a sliding-window call budget by
//! making callers wait, never by dropping calls. Remote-side throttling must
//! not silently lose crawl coverage.

#![deny(unsafe_code)]

pub mod catalog;
pub mod errors;
pub mod rate_limit;

pub use catalog::CatalogClient;
pub use errors::{ClientError, Result};
pub use rate_limit::{RateLimitConfig, RateLimiter};

//! # starsync-store
//!
//! SQLite-backed mirror store for the starsync catalog mirror.
//!
//! Layout follows a repository pattern: stateless repo structs whose methods
//! take `&Connection`, composed behind the pooled [`MirrorStore`] facade.
//!
//! - [`sqlite::connection`] — r2d2 connection pool with WAL pragmas
//! - [`sqlite::migrations`] — idempotent schema creation
//! - [`sqlite::repositories`] — CRUD for `systems`, `bodies`, `sync_state`
//! - [`store::MirrorStore`] — one pooled connection per call; each call is
//!   independently transactional (single statement)
//!
//! Absence is never an error here: lookups return `Ok(None)` so the
//! reconciler can branch on it directly.

#![deny(unsafe_code)]

pub mod errors;
pub mod sqlite;
pub mod store;

pub use errors::{Result, StoreError};
pub use sqlite::connection::{ConnectionConfig, ConnectionPool, PooledConnection, open_pool};
pub use sqlite::migrations::run_migrations;
pub use sqlite::row_types::{BodyRow, SyncStateRow, SystemRow};
pub use store::MirrorStore;

//! # starsync-core
//!
//! Foundation types for the starsync catalog mirror.
//!
//! This crate provides the shared vocabulary that all other starsync crates
//! depend on:
//!
//! - **Keys**: [`ids::EntityKey`] composite identity, [`ids::EntityKind`]
//! - **Documents**: [`document::Document`] open attribute map for remote records
//! - **Coordinates**: [`coordinate::Coordinate`] 3D point with the region margin test
//! - **Hashing**: [`hash::digest`] canonical content digest for change detection
//! - **Entities**: [`entities::System`], [`entities::Body`], [`entities::SyncState`]
//! - **Errors**: [`errors::CoreError`] via `thiserror`
//! - **Logging**: [`logging::init_subscriber`] tracing setup
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other starsync crates.

#![deny(unsafe_code)]

pub mod coordinate;
pub mod document;
pub mod entities;
pub mod errors;
pub mod hash;
pub mod ids;
pub mod logging;

pub use coordinate::Coordinate;
pub use document::Document;
pub use entities::{Body, SyncState, System};
pub use errors::{CoreError, Result};
pub use ids::{EntityKey, EntityKind};

//! High-level pooled store facade.

mod mirror_store;

pub use mirror_store::MirrorStore;

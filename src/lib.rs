//! Brezza: a versioned, incrementally-updatable index of blog-post metadata
//! for static content hosts, plus a file-backed cache for expensive lookups.
//!
//! The index side publishes numbered snapshots of a division's metadata as
//! plain artifacts (`index.json`, `index.json.gz`, `index.version`) alongside
//! per-version changeset diffs, so remote readers can poll a version marker
//! and fetch only what changed. The cache side keeps a concurrent in-memory
//! map mirrored to one file per key, with TTLs, tags and priority-based
//! eviction.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
pub mod util;

pub use application::publisher::{IndexPublisher, IndexUpdateResult, PublishError};
pub use cache::{CacheConfig, CacheDocument, CacheService, CacheStatistics};
pub use domain::index::{BlogIndex, BlogIndexChangeset, compute_changeset};
pub use domain::metadata::{BlogHierarchy, BlogMetadata};
pub use infra::storage::{FsIndexStorage, IndexStorage, StorageError};

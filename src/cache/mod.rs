//! Dual-tier cache for expensive lookups.
//!
//! An in-memory concurrent map is the source of truth, mirrored to one
//! backing file per key so entries survive a process restart. Expiry,
//! tagging, priority eviction and batch operations live in
//! [`service::CacheService`].
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! directory = "/var/cache/brezza"
//! default_ttl_hours = 24
//! ```

pub mod config;
pub mod document;
pub mod pattern;
pub mod service;

pub use config::CacheConfig;
pub use document::CacheDocument;
pub use service::{CacheService, CacheStatistics};

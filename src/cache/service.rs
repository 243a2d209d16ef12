//! Dual-tier cache: a concurrent in-memory map mirrored to one backing file
//! per key.
//!
//! The in-memory map is the source of truth. Backing-file writes are
//! best-effort: an I/O failure is logged and reduced to `false`, never
//! surfaced as an error. Two concurrent writers to the same key may
//! interleave file writes; last writer wins, which the cache's role
//! tolerates. Per-entry stat bumps go through the map's per-shard locking,
//! so concurrent readers of the same key may observe slightly stale counts.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use metrics::counter;
use time::OffsetDateTime;
use tokio::fs;
use tracing::{debug, warn};

use super::config::CacheConfig;
use super::document::CacheDocument;
use super::pattern;

const FILE_SUFFIX: &str = ".cache";

/// Point-in-time summary of the in-memory tier.
///
/// `hit_rate` is distinct items divided by the total access count — a coarse
/// approximation kept for compatibility with existing consumers, not a true
/// hit-vs-miss ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStatistics {
    pub total_items: usize,
    pub total_size: u64,
    pub expired_items: usize,
    pub hit_rate: f64,
    pub avg_access_count: f64,
}

/// File-backed cache keyed by strings unique within the service.
pub struct CacheService {
    entries: DashMap<String, CacheDocument>,
    directory: PathBuf,
    default_ttl_hours: i64,
}

impl CacheService {
    /// Open a cache rooted at the configured directory, creating it if
    /// necessary.
    pub fn new(config: &CacheConfig) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&config.directory)?;
        Ok(Self {
            entries: DashMap::new(),
            directory: config.directory.clone(),
            default_ttl_hours: config.default_ttl_hours,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ========================================================================
    // Set / get
    // ========================================================================

    /// Insert or replace an entry. Memory is always updated; the returned
    /// bool reports whether the backing file write succeeded.
    pub async fn set(&self, document: CacheDocument) -> bool {
        let key = document.cache_key.clone();
        self.entries.insert(key.clone(), document.clone());
        self.persist(&document).await
    }

    /// Insert a string value under `key`. `ttl_hours` falls back to the
    /// configured default; negative values produce an already-expired entry.
    pub async fn set_value(
        &self,
        key: &str,
        value: &str,
        ttl_hours: Option<i64>,
        data_type: &str,
    ) -> bool {
        let ttl = ttl_hours.unwrap_or(self.default_ttl_hours);
        self.set(CacheDocument::new(key, data_type, value, ttl)).await
    }

    /// Insert several documents; returns how many backing-file writes
    /// succeeded. Memory is updated for every document regardless.
    pub async fn set_batch(&self, documents: Vec<CacheDocument>) -> usize {
        let mut persisted = 0;
        for document in documents {
            if self.set(document).await {
                persisted += 1;
            }
        }
        persisted
    }

    /// Expiry-aware lookup. A hit bumps the entry's last-accessed stamp and
    /// access count; an expired entry is removed from memory and disk. On a
    /// memory miss the backing file is consulted and repopulates memory.
    pub async fn get(&self, key: &str) -> Option<CacheDocument> {
        if let Some(mut entry) = self.entries.get_mut(key) {
            if entry.is_expired() {
                drop(entry);
                self.remove(key).await;
                counter!("brezza_cache_miss_total").increment(1);
                return None;
            }
            entry.update_access();
            counter!("brezza_cache_hit_total").increment(1);
            return Some(entry.clone());
        }

        match self.load(key).await {
            Some(mut document) if !document.is_expired() => {
                document.update_access();
                self.entries.insert(key.to_string(), document.clone());
                counter!("brezza_cache_hit_total").increment(1);
                Some(document)
            }
            Some(_) => {
                // Stale backing file left over from a previous process.
                self.delete_file(key).await;
                counter!("brezza_cache_miss_total").increment(1);
                None
            }
            None => {
                counter!("brezza_cache_miss_total").increment(1);
                None
            }
        }
    }

    /// Lookup returning only the payload.
    pub async fn get_value(&self, key: &str) -> Option<String> {
        self.get(key).await.map(|document| document.data)
    }

    /// Look up several keys at once. Absent or expired keys are simply
    /// missing from the result; each hit counts as one access.
    pub async fn get_batch(&self, keys: &[String]) -> HashMap<String, CacheDocument> {
        let mut found = HashMap::with_capacity(keys.len());
        for key in keys {
            if let Some(document) = self.get(key).await {
                found.insert(key.clone(), document);
            }
        }
        found
    }

    /// Expiry-aware existence check that does not touch access stats. An
    /// expired in-memory entry is removed; otherwise presence of the backing
    /// file counts as existing.
    pub async fn exists(&self, key: &str) -> bool {
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired() {
                return true;
            }
            drop(entry);
            self.remove(key).await;
            return false;
        }
        fs::try_exists(self.file_path(key)).await.unwrap_or(false)
    }

    // ========================================================================
    // Removal
    // ========================================================================

    /// Remove one entry from memory and disk. Returns whether the key was
    /// present in memory; the file delete is attempted regardless.
    pub async fn remove(&self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        self.delete_file(key).await;
        removed
    }

    /// Remove several keys; returns how many were present in memory.
    pub async fn remove_batch(&self, keys: &[String]) -> usize {
        let mut removed = 0;
        for key in keys {
            if self.remove(key).await {
                removed += 1;
            }
        }
        removed
    }

    /// Remove every entry carrying `tag`; returns the count removed.
    pub async fn remove_by_tag(&self, tag: &str) -> usize {
        let keys = self.collect_keys(|document| document.tags.iter().any(|t| t == tag));
        self.remove_collected(keys).await
    }

    /// Remove every entry of the given data type; returns the count removed.
    pub async fn remove_by_data_type(&self, data_type: &str) -> usize {
        let keys = self.collect_keys(|document| document.data_type == data_type);
        self.remove_collected(keys).await
    }

    /// Remove every entry whose key matches the wildcard pattern.
    pub async fn remove_by_pattern(&self, glob: &str) -> usize {
        let keys = self.collect_keys(|document| pattern::matches(&document.cache_key, glob));
        self.remove_collected(keys).await
    }

    // ========================================================================
    // Expiry metadata
    // ========================================================================

    /// Push an entry's expiry out by `hours`. No-op (false) when absent.
    pub async fn extend_expiration(&self, key: &str, hours: i64) -> bool {
        let updated = match self.entries.get_mut(key) {
            Some(mut entry) => {
                entry.extend_expiration(hours);
                entry.clone()
            }
            None => return false,
        };
        self.persist(&updated).await;
        true
    }

    /// Bump an entry's access stats and rewrite its backing file. No-op
    /// (false) when absent.
    pub async fn refresh(&self, key: &str) -> bool {
        let updated = match self.entries.get_mut(key) {
            Some(mut entry) => {
                entry.update_access();
                entry.clone()
            }
            None => return false,
        };
        self.persist(&updated).await;
        true
    }

    // ========================================================================
    // Statistics and key listing
    // ========================================================================

    /// Compute summary statistics from the current in-memory state.
    pub fn statistics(&self) -> CacheStatistics {
        let total_items = self.entries.len();
        let mut total_size = 0u64;
        let mut expired_items = 0usize;
        let mut total_access = 0u64;
        for entry in self.entries.iter() {
            total_size += entry.size;
            total_access += entry.access_count;
            if entry.is_expired() {
                expired_items += 1;
            }
        }

        let hit_rate = if total_access > 0 {
            total_items as f64 / total_access as f64
        } else {
            0.0
        };
        let avg_access_count = if total_items > 0 {
            total_access as f64 / total_items as f64
        } else {
            0.0
        };

        CacheStatistics {
            total_items,
            total_size,
            expired_items,
            hit_rate,
            avg_access_count,
        }
    }

    /// Keys matching the wildcard pattern, capped at `limit`.
    pub fn keys(&self, glob: &str, limit: usize) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| pattern::matches(entry.key(), glob))
            .map(|entry| entry.key().clone())
            .take(limit)
            .collect()
    }

    /// Keys of entries carrying `tag`, capped at `limit`.
    pub fn keys_by_tag(&self, tag: &str, limit: usize) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| entry.tags.iter().any(|t| t == tag))
            .map(|entry| entry.key().clone())
            .take(limit)
            .collect()
    }

    /// Keys of entries of the given data type, capped at `limit`.
    pub fn keys_by_data_type(&self, data_type: &str, limit: usize) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| entry.data_type == data_type)
            .map(|entry| entry.key().clone())
            .take(limit)
            .collect()
    }

    // ========================================================================
    // Cleanup sweeps
    // ========================================================================

    /// Remove every entry past its expiry; returns the count removed.
    pub async fn cleanup_expired(&self) -> usize {
        let keys = self.collect_keys(|document| document.is_expired());
        let removed = self.remove_collected(keys).await;
        counter!("brezza_cache_evict_total").increment(removed as u64);
        removed
    }

    /// Evict the `count` entries with the oldest last-accessed stamp,
    /// regardless of expiry. Pure LRU, independent of TTL.
    pub async fn cleanup_least_used(&self, count: usize) -> usize {
        let mut by_access: Vec<(String, OffsetDateTime)> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.last_accessed_at))
            .collect();
        by_access.sort_by_key(|(_, accessed)| *accessed);

        let keys: Vec<String> = by_access.into_iter().take(count).map(|(k, _)| k).collect();
        let removed = self.remove_collected(keys).await;
        counter!("brezza_cache_evict_total").increment(removed as u64);
        removed
    }

    /// Remove every entry with priority at or below the threshold.
    pub async fn cleanup_low_priority(&self, max_priority: i32) -> usize {
        let keys = self.collect_keys(|document| document.priority <= max_priority);
        let removed = self.remove_collected(keys).await;
        counter!("brezza_cache_evict_total").increment(removed as u64);
        removed
    }

    /// Wipe memory and the entire backing directory. Best effort: returns
    /// false when the directory could not be recreated.
    pub async fn clear_all(&self) -> bool {
        self.entries.clear();
        if let Err(err) = fs::remove_dir_all(&self.directory).await {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!(directory = %self.directory.display(), error = %err, "Failed to clear cache directory");
                return false;
            }
        }
        match fs::create_dir_all(&self.directory).await {
            Ok(()) => true,
            Err(err) => {
                warn!(directory = %self.directory.display(), error = %err, "Failed to recreate cache directory");
                false
            }
        }
    }

    // ========================================================================
    // Export / import
    // ========================================================================

    /// Serialize all non-expired entries matching the pattern to one file.
    pub async fn export(&self, path: &Path, glob: &str) -> bool {
        let mut documents: Vec<CacheDocument> = self
            .entries
            .iter()
            .filter(|entry| !entry.is_expired() && pattern::matches(entry.key(), glob))
            .map(|entry| entry.clone())
            .collect();
        documents.sort_by(|a, b| a.cache_key.cmp(&b.cache_key));

        let json = match serde_json::to_string_pretty(&documents) {
            Ok(json) => json,
            Err(err) => {
                warn!(error = %err, "Failed to serialize cache export");
                return false;
            }
        };
        match fs::write(path, json).await {
            Ok(()) => true,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Failed to write cache export");
                false
            }
        }
    }

    /// Load entries from an export file. Existing keys are skipped unless
    /// `overwrite` is set. Returns the number of entries imported; a missing
    /// or corrupt file imports nothing.
    pub async fn import(&self, path: &Path, overwrite: bool) -> usize {
        let json = match fs::read_to_string(path).await {
            Ok(json) => json,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Failed to read cache import");
                return 0;
            }
        };
        let documents: Vec<CacheDocument> = match serde_json::from_str(&json) {
            Ok(documents) => documents,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Cache import file is not valid JSON");
                return 0;
            }
        };

        let mut imported = 0;
        for document in documents {
            if !overwrite && self.entries.contains_key(&document.cache_key) {
                continue;
            }
            self.set(document).await;
            imported += 1;
        }
        imported
    }

    // ========================================================================
    // Backing files
    // ========================================================================

    fn file_path(&self, key: &str) -> PathBuf {
        let sanitized: String = key
            .chars()
            .map(|ch| {
                if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.') {
                    ch
                } else {
                    '_'
                }
            })
            .collect();
        self.directory.join(format!("{sanitized}{FILE_SUFFIX}"))
    }

    async fn persist(&self, document: &CacheDocument) -> bool {
        let json = match serde_json::to_string(document) {
            Ok(json) => json,
            Err(err) => {
                warn!(key = %document.cache_key, error = %err, "Failed to serialize cache document");
                return false;
            }
        };
        match fs::write(self.file_path(&document.cache_key), json).await {
            Ok(()) => true,
            Err(err) => {
                warn!(key = %document.cache_key, error = %err, "Failed to persist cache document");
                false
            }
        }
    }

    async fn load(&self, key: &str) -> Option<CacheDocument> {
        let path = self.file_path(key);
        let json = match fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!(key, error = %err, "Failed to read cache backing file");
                }
                return None;
            }
        };
        let document: CacheDocument = match serde_json::from_str(&json) {
            Ok(document) => document,
            Err(err) => {
                // Corrupt backing files count as a miss, not an error.
                debug!(key, error = %err, "Ignoring corrupt cache backing file");
                return None;
            }
        };
        // Sanitization can map two distinct keys onto one file name; only
        // the key the file was written for may load it.
        if document.cache_key != key {
            debug!(
                key,
                stored_key = %document.cache_key,
                "Backing file holds a different key, treating as a miss"
            );
            return None;
        }
        Some(document)
    }

    async fn delete_file(&self, key: &str) {
        let path = self.file_path(key);
        if let Err(err) = fs::remove_file(&path).await {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!(key, error = %err, "Failed to delete cache backing file");
            }
        }
    }

    fn collect_keys(&self, predicate: impl Fn(&CacheDocument) -> bool) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.key().clone())
            .collect()
    }

    async fn remove_collected(&self, keys: Vec<String>) -> usize {
        let mut removed = 0;
        for key in keys {
            if self.remove(&key).await {
                removed += 1;
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn service(dir: &TempDir) -> CacheService {
        let config = CacheConfig {
            directory: dir.path().to_path_buf(),
            default_ttl_hours: 24,
        };
        CacheService::new(&config).expect("cache directory should be creatable")
    }

    #[tokio::test]
    async fn set_then_get_bumps_access_count_once() {
        let dir = TempDir::new().expect("tempdir");
        let cache = service(&dir);

        assert!(cache.set_value("greeting", "v", Some(1), "String").await);

        let document = cache.get("greeting").await.expect("cached entry");
        assert_eq!(document.data, "v");
        assert_eq!(document.access_count, 1);

        let again = cache.get("greeting").await.expect("cached entry");
        assert_eq!(again.access_count, 2);
    }

    #[tokio::test]
    async fn expired_entry_is_absent_and_file_is_removed() {
        let dir = TempDir::new().expect("tempdir");
        let cache = service(&dir);

        cache.set_value("stale", "v", Some(-1), "String").await;
        let path = cache.file_path("stale");
        assert!(path.exists());

        assert!(cache.get("stale").await.is_none());
        assert!(!cache.exists("stale").await);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn batch_get_returns_only_live_entries() {
        let dir = TempDir::new().expect("tempdir");
        let cache = service(&dir);

        let documents = vec![
            CacheDocument::new("a", "String", "v1", 1),
            CacheDocument::new("b", "String", "v2", 1),
            CacheDocument::new("stale", "String", "v3", -1),
        ];
        assert_eq!(cache.set_batch(documents).await, 3);

        let keys: Vec<String> = ["a", "b", "stale", "missing"]
            .iter()
            .map(|k| k.to_string())
            .collect();
        let found = cache.get_batch(&keys).await;
        assert_eq!(found.len(), 2);
        assert_eq!(found["a"].data, "v1");
        assert_eq!(found["b"].data, "v2");
        assert!(!found.contains_key("stale"));
    }

    #[tokio::test]
    async fn colliding_sanitized_keys_do_not_cross_load() {
        let dir = TempDir::new().expect("tempdir");
        {
            let cache = service(&dir);
            // "a:b" and "a_b" share one backing file name after sanitization.
            cache.set_value("a:b", "colon", Some(1), "String").await;
        }

        let cache = service(&dir);
        assert!(cache.get("a_b").await.is_none());
        assert_eq!(cache.get_value("a:b").await.as_deref(), Some("colon"));
    }

    #[tokio::test]
    async fn get_falls_back_to_backing_file() {
        let dir = TempDir::new().expect("tempdir");
        {
            let cache = service(&dir);
            cache.set_value("persisted", "v", Some(1), "String").await;
        }

        // Fresh service, same directory: memory is empty, file is not.
        let cache = service(&dir);
        assert!(cache.is_empty());
        let document = cache.get("persisted").await.expect("reloaded entry");
        assert_eq!(document.data, "v");
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn exists_does_not_touch_access_stats() {
        let dir = TempDir::new().expect("tempdir");
        let cache = service(&dir);

        cache.set_value("k", "v", Some(1), "String").await;
        assert!(cache.exists("k").await);

        let document = cache.get("k").await.expect("cached entry");
        assert_eq!(document.access_count, 1);
    }

    #[tokio::test]
    async fn remove_by_tag_removes_exactly_tagged_entries() {
        let dir = TempDir::new().expect("tempdir");
        let cache = service(&dir);

        let mut tagged = CacheDocument::new("a", "String", "v", 1);
        tagged.add_tag("blog_index");
        cache.set(tagged).await;

        let mut also_tagged = CacheDocument::new("b", "String", "v", 1);
        also_tagged.add_tag("blog_index");
        also_tagged.add_tag("other");
        cache.set(also_tagged).await;

        cache.set_value("c", "v", Some(1), "String").await;

        assert_eq!(cache.remove_by_tag("blog_index").await, 2);
        assert!(!cache.exists("a").await);
        assert!(!cache.exists("b").await);
        assert!(cache.exists("c").await);
    }

    #[tokio::test]
    async fn remove_by_pattern_uses_wildcards() {
        let dir = TempDir::new().expect("tempdir");
        let cache = service(&dir);

        cache.set_value("blog_index:tech", "v", Some(1), "String").await;
        cache.set_value("blog_index:life", "v", Some(1), "String").await;
        cache.set_value("hierarchy:tech", "v", Some(1), "String").await;

        assert_eq!(cache.remove_by_pattern("blog_index:*").await, 2);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn cleanup_least_used_evicts_oldest_accessed() {
        let dir = TempDir::new().expect("tempdir");
        let cache = service(&dir);

        for key in ["one", "two", "three", "four", "five"] {
            cache.set_value(key, "v", Some(1), "String").await;
        }
        // Touch three of them so "one" and "two" stay the oldest.
        for key in ["three", "four", "five"] {
            cache.get(key).await.expect("cached entry");
        }

        assert_eq!(cache.cleanup_least_used(2).await, 2);
        assert_eq!(cache.len(), 3);
        assert!(!cache.exists("one").await);
        assert!(!cache.exists("two").await);
    }

    #[tokio::test]
    async fn cleanup_low_priority_honours_threshold() {
        let dir = TempDir::new().expect("tempdir");
        let cache = service(&dir);

        let mut important = CacheDocument::new("keep", "String", "v", 1);
        important.priority = 2;
        cache.set(important).await;
        cache.set_value("drop", "v", Some(1), "String").await;

        assert_eq!(cache.cleanup_low_priority(1).await, 1);
        assert!(cache.exists("keep").await);
        assert!(!cache.exists("drop").await);
    }

    #[tokio::test]
    async fn extend_expiration_revives_a_nearly_expired_entry() {
        let dir = TempDir::new().expect("tempdir");
        let cache = service(&dir);

        cache.set_value("k", "v", Some(-1), "String").await;
        assert!(cache.extend_expiration("k", 48).await);
        assert!(cache.get("k").await.is_some());

        assert!(!cache.extend_expiration("missing", 1).await);
    }

    #[tokio::test]
    async fn refresh_updates_stats_for_present_entries_only() {
        let dir = TempDir::new().expect("tempdir");
        let cache = service(&dir);

        cache.set_value("k", "v", Some(1), "String").await;
        assert!(cache.refresh("k").await);
        let document = cache.get("k").await.expect("cached entry");
        assert_eq!(document.access_count, 2);

        assert!(!cache.refresh("missing").await);
    }

    #[tokio::test]
    async fn statistics_reflect_current_state() {
        let dir = TempDir::new().expect("tempdir");
        let cache = service(&dir);

        cache.set_value("a", "12345", Some(1), "String").await;
        cache.set_value("b", "1234567890", Some(-1), "String").await;
        cache.get("a").await.expect("cached entry");

        let stats = cache.statistics();
        assert_eq!(stats.total_items, 2);
        assert_eq!(stats.total_size, 15);
        assert_eq!(stats.expired_items, 1);
        // One access over two items: the compatibility formula reports 2.0.
        assert!((stats.hit_rate - 2.0).abs() < f64::EPSILON);
        assert!((stats.avg_access_count - 0.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn clear_all_wipes_memory_and_directory() {
        let dir = TempDir::new().expect("tempdir");
        let cache = service(&dir);

        cache.set_value("a", "v", Some(1), "String").await;
        cache.set_value("b", "v", Some(1), "String").await;

        assert!(cache.clear_all().await);
        assert!(cache.is_empty());
        assert!(!cache.exists("a").await);
    }

    #[tokio::test]
    async fn export_then_import_round_trips_matching_entries() {
        let dir = TempDir::new().expect("tempdir");
        let cache = service(&dir);

        cache.set_value("blog_index:tech", "payload", Some(1), "String").await;
        cache.set_value("hierarchy:tech", "other", Some(1), "String").await;
        cache.set_value("expired", "gone", Some(-1), "String").await;

        let export_path = dir.path().join("export.json");
        assert!(cache.export(&export_path, "blog_index:*").await);

        let other_dir = TempDir::new().expect("tempdir");
        let target = service(&other_dir);
        assert_eq!(target.import(&export_path, false).await, 1);
        assert_eq!(
            target.get_value("blog_index:tech").await.as_deref(),
            Some("payload")
        );
        assert!(target.get("hierarchy:tech").await.is_none());
    }

    #[tokio::test]
    async fn import_respects_overwrite_flag() {
        let dir = TempDir::new().expect("tempdir");
        let cache = service(&dir);
        cache.set_value("k", "original", Some(1), "String").await;

        let export_path = dir.path().join("export.json");
        assert!(cache.export(&export_path, "*").await);

        cache.set_value("k", "changed", Some(1), "String").await;

        assert_eq!(cache.import(&export_path, false).await, 0);
        assert_eq!(cache.get_value("k").await.as_deref(), Some("changed"));

        assert_eq!(cache.import(&export_path, true).await, 1);
        assert_eq!(cache.get_value("k").await.as_deref(), Some("original"));
    }

    #[tokio::test]
    async fn key_listing_filters_by_pattern_tag_and_type() {
        let dir = TempDir::new().expect("tempdir");
        let cache = service(&dir);

        let mut tagged = CacheDocument::new("blog_index:tech", "BlogIndex", "v", 1);
        tagged.add_tag("blog_index");
        cache.set(tagged).await;
        cache.set_value("hierarchy:tech", "v", Some(1), "String").await;

        assert_eq!(cache.keys("blog_index:*", 10), vec!["blog_index:tech"]);
        assert_eq!(cache.keys_by_tag("blog_index", 10), vec!["blog_index:tech"]);
        assert_eq!(cache.keys_by_data_type("String", 10), vec!["hierarchy:tech"]);
        assert!(cache.keys("*", 0).is_empty());
    }

    #[test]
    fn file_names_are_sanitized() {
        let dir = TempDir::new().expect("tempdir");
        let cache = service(&dir);

        let path = cache.file_path("blog_index:tech/2024?");
        let name = path.file_name().expect("file name").to_string_lossy().into_owned();
        assert_eq!(name, "blog_index_tech_2024_.cache");
    }
}

//! One cached key/value entry with expiry, access and classification
//! metadata.
//!
//! Documents are owned exclusively by the cache service; the backing file is
//! a PascalCase JSON rendering of this struct.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::domain::index::BlogIndex;
use crate::domain::metadata::BlogHierarchy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CacheDocument {
    pub cache_key: String,
    pub data_type: String,
    /// Serialized value payload, usually JSON.
    pub data: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_accessed_at: OffsetDateTime,
    pub access_count: u64,
    pub version: u32,
    pub tags: Vec<String>,
    /// Payload size in bytes.
    pub size: u64,
    pub is_compressed: bool,
    /// Higher survives `cleanup_low_priority` longer.
    pub priority: i32,
    /// Source files this entry was derived from.
    pub dependencies: Vec<String>,
    pub metadata: BTreeMap<String, String>,
}

impl CacheDocument {
    /// Build a document expiring `ttl_hours` from now. Negative values
    /// produce an entry that is already expired.
    pub fn new(
        cache_key: impl Into<String>,
        data_type: impl Into<String>,
        data: impl Into<String>,
        ttl_hours: i64,
    ) -> Self {
        let data = data.into();
        let now = OffsetDateTime::now_utc();
        Self {
            cache_key: cache_key.into(),
            data_type: data_type.into(),
            size: data.len() as u64,
            data,
            created_at: now,
            expires_at: now + Duration::hours(ttl_hours),
            last_accessed_at: now,
            access_count: 0,
            version: 1,
            tags: Vec::new(),
            is_compressed: false,
            priority: 1,
            dependencies: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn is_expired(&self) -> bool {
        OffsetDateTime::now_utc() > self.expires_at
    }

    /// Record a read: bump the access count and the last-accessed stamp.
    pub fn update_access(&mut self) {
        self.last_accessed_at = OffsetDateTime::now_utc();
        self.access_count += 1;
    }

    /// Push the expiry out by `hours` relative to the current expiry.
    pub fn extend_expiration(&mut self, hours: i64) {
        self.expires_at += Duration::hours(hours);
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !tag.is_empty() && !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    pub fn add_dependency(&mut self, file_path: impl Into<String>) {
        let file_path = file_path.into();
        if !file_path.is_empty() && !self.dependencies.contains(&file_path) {
            self.dependencies.push(file_path);
        }
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if !key.is_empty() {
            self.metadata.insert(key, value.into());
        }
    }

    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Build a colon-joined cache key from a prefix and its parameters.
    pub fn cache_key_for(prefix: &str, parts: &[&str]) -> String {
        if parts.is_empty() {
            prefix.to_string()
        } else {
            format!("{prefix}:{}", parts.join(":"))
        }
    }

    /// Cache entry for a division's full index: 12 hour TTL, high priority.
    pub fn for_blog_index(division: &str, index: &BlogIndex) -> Result<Self, serde_json::Error> {
        let mut document = Self::new(
            Self::cache_key_for("blog_index", &[division]),
            "BlogIndex",
            serde_json::to_string(index)?,
            12,
        );
        document.add_tag("blog_index");
        document.add_tag(format!("division:{division}"));
        document.priority = 2;
        Ok(document)
    }

    /// Cache entry for a hierarchy node: 24 hour TTL, default priority.
    pub fn for_hierarchy(hierarchy: &BlogHierarchy) -> Result<Self, serde_json::Error> {
        let mut document = Self::new(
            Self::cache_key_for(
                "hierarchy",
                &[
                    hierarchy.division.as_str(),
                    hierarchy.category.as_str(),
                    hierarchy.sub_category.as_str(),
                ],
            ),
            "BlogHierarchy",
            serde_json::to_string(hierarchy)?,
            24,
        );
        document.add_tag("hierarchy");
        document.add_tag(format!("division:{}", hierarchy.division));
        Ok(document)
    }
}

//! Blog post metadata as published in the division index.
//!
//! Field names are part of the wire contract consumed by remote readers, so
//! every type here serializes with PascalCase keys.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::warn;

use crate::domain::error::DomainError;

/// Hierarchical placement of a post inside a division.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BlogHierarchy {
    pub division: String,
    pub category: String,
    pub sub_category: String,
}

/// Metadata for one blog post. Identity within a division is `file_path`.
///
/// Value equality over all fields is what the changeset diff relies on to
/// classify an entry as updated, so derived `PartialEq` is load-bearing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BlogMetadata {
    pub file_path: String,
    pub title: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub tags: Vec<String>,
    pub cover_images: Vec<String>,
    pub hierarchy: BlogHierarchy,
    /// Ordered path segments for path-based addressing. `None` disables
    /// path mode for this post; the two addressing modes are exclusive.
    pub path_segments: Option<Vec<String>>,
    pub is_draft: bool,
}

impl BlogMetadata {
    /// Whether this post is addressed by path segments instead of hierarchy.
    pub fn is_path_mode(&self) -> bool {
        self.path_segments.is_some()
    }

    /// Check the structural invariants a publishable entry must satisfy.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.file_path.trim().is_empty() {
            return Err(DomainError::validation("file path must not be empty"));
        }
        if self.hierarchy.division.trim().is_empty() {
            return Err(DomainError::validation(format!(
                "post `{}` has an empty division",
                self.file_path
            )));
        }
        if let Some(segments) = self.path_segments.as_ref() {
            if segments.is_empty() || segments.iter().any(|s| s.trim().is_empty()) {
                return Err(DomainError::validation(format!(
                    "post `{}` has empty path segments",
                    self.file_path
                )));
            }
        }
        Ok(())
    }
}

/// Drop entries that fail validation, keeping the rest of the batch.
///
/// Extraction feeds the index in bulk; one malformed post must not abort the
/// whole publish, so rejects are logged and discarded.
pub fn retain_valid(entries: Vec<BlogMetadata>) -> Vec<BlogMetadata> {
    entries
        .into_iter()
        .filter(|entry| match entry.validate() {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    file_path = %entry.file_path,
                    error = %err,
                    "Discarding metadata entry that failed validation"
                );
                false
            }
        })
        .collect()
}

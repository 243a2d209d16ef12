//! The versioned index aggregate and the diff engine between two versions.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::error::DomainError;
use crate::domain::metadata::BlogMetadata;

/// One published snapshot of all metadata in a division.
///
/// `id` increases strictly with every successful publish; enforcing that
/// ordering is the publisher's job, not this type's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BlogIndex {
    pub id: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub date_time: OffsetDateTime,
    pub blog_metadata_list: Vec<BlogMetadata>,
}

impl BlogIndex {
    /// Pure construction: preserves the entry list exactly as given and
    /// performs no ordering checks on `id`.
    pub fn new(id: u32, blog_metadata_list: Vec<BlogMetadata>, date_time: OffsetDateTime) -> Self {
        Self {
            id,
            date_time,
            blog_metadata_list,
        }
    }
}

/// Delta between two index versions, keyed by `file_path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BlogIndexChangeset {
    pub from_version: u32,
    pub to_version: u32,
    pub added: Vec<BlogMetadata>,
    pub updated: Vec<BlogMetadata>,
    pub deleted: Vec<String>,
}

/// Diff two snapshots into an added/updated/deleted changeset.
///
/// Entries present only in `new` are added, entries present in both whose
/// content differs are updated, and keys present only in `old` are deleted.
/// The snapshots must already be ordered: `new.id` must exceed `old.id`.
pub fn compute_changeset(
    old: &BlogIndex,
    new: &BlogIndex,
) -> Result<BlogIndexChangeset, DomainError> {
    if new.id <= old.id {
        return Err(DomainError::invariant(format!(
            "changeset requires a forward version step, got {} -> {}",
            old.id, new.id
        )));
    }

    let old_by_path: HashMap<&str, &BlogMetadata> = old
        .blog_metadata_list
        .iter()
        .map(|entry| (entry.file_path.as_str(), entry))
        .collect();

    let mut added = Vec::new();
    let mut updated = Vec::new();
    for entry in &new.blog_metadata_list {
        match old_by_path.get(entry.file_path.as_str()) {
            None => added.push(entry.clone()),
            Some(previous) if *previous != entry => updated.push(entry.clone()),
            Some(_) => {}
        }
    }

    let new_paths: HashSet<&str> = new
        .blog_metadata_list
        .iter()
        .map(|entry| entry.file_path.as_str())
        .collect();
    let deleted = old
        .blog_metadata_list
        .iter()
        .filter(|entry| !new_paths.contains(entry.file_path.as_str()))
        .map(|entry| entry.file_path.clone())
        .collect();

    Ok(BlogIndexChangeset {
        from_version: old.id,
        to_version: new.id,
        added,
        updated,
        deleted,
    })
}

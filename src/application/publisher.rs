//! Index publish orchestration: factory, codec, compressor and storage in
//! one forward pass.

use std::path::Path;
use std::time::Instant;

use metrics::histogram;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::info;

use crate::domain::error::DomainError;
use crate::domain::index::{self, BlogIndex, BlogIndexChangeset};
use crate::domain::metadata::BlogMetadata;
use crate::infra::codec::{self, CodecError};
use crate::infra::compress;
use crate::infra::storage::{IndexStorage, StorageError};
use crate::util::bytes::format_bytes;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("index publish io failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of one published index version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexUpdateResult {
    pub uncompressed_size: usize,
    pub compressed_size: usize,
    pub version: u32,
}

/// Publishes index versions to a division root.
///
/// Exactly one new version is published per `update_index` call. The
/// three-artifact write is not transactional across concurrent publishers;
/// callers must serialize publishes per division root themselves (a single
/// publisher process or an external lock).
pub struct IndexPublisher<S: IndexStorage> {
    storage: S,
    keep_changesets: usize,
}

impl<S: IndexStorage> IndexPublisher<S> {
    pub fn new(storage: S, keep_changesets: usize) -> Self {
        Self {
            storage,
            keep_changesets,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Build and persist the next index version from the given metadata.
    ///
    /// `current_version` short-circuits the marker read when the caller has
    /// already resolved it; otherwise storage is asked.
    pub async fn update_index(
        &self,
        root: &Path,
        metadata_list: Vec<BlogMetadata>,
        current_version: Option<u32>,
    ) -> Result<IndexUpdateResult, PublishError> {
        let started = Instant::now();

        let version = match current_version {
            Some(version) => version,
            None => self.storage.current_version(root).await?,
        };
        let new_version = version + 1;

        let index = BlogIndex::new(new_version, metadata_list, OffsetDateTime::now_utc());
        let json = codec::encode_index(&index)?;
        let binary = compress::compress(&json)?;

        self.storage
            .save_index(root, &json, &binary, new_version)
            .await?;

        histogram!("brezza_index_publish_seconds").record(started.elapsed().as_secs_f64());
        info!(
            version = new_version,
            entries = index.blog_metadata_list.len(),
            uncompressed = %format_bytes(json.len() as u64),
            compressed = %format_bytes(binary.len() as u64),
            root = %root.display(),
            "Published index version"
        );

        Ok(IndexUpdateResult {
            uncompressed_size: json.len(),
            compressed_size: binary.len(),
            version: new_version,
        })
    }

    /// Compute the delta between two snapshots, persist it, and apply the
    /// retention policy to older changesets.
    pub async fn publish_changeset(
        &self,
        root: &Path,
        old: &BlogIndex,
        new: &BlogIndex,
    ) -> Result<BlogIndexChangeset, PublishError> {
        let changeset = index::compute_changeset(old, new)?;
        self.storage.save_changeset(root, &changeset).await?;

        let removed = self
            .storage
            .cleanup_old_changesets(root, self.keep_changesets)
            .await?;
        if removed > 0 {
            info!(
                removed,
                keep = self.keep_changesets,
                root = %root.display(),
                "Pruned old changesets"
            );
        }

        Ok(changeset)
    }
}

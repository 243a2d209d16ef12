//! Filesystem persistence of index artifacts.
//!
//! Artifact names are part of the wire contract: remote readers fetch them
//! by name over plain HTTP, so they must never change shape.
//!
//! A single `save_index` writes full JSON, then the gzip binary, then the
//! version marker. A reader therefore never observes a marker pointing at
//! artifacts that do not exist yet. The write is not transactional against
//! concurrent publishers; serializing publishers per division root is a
//! caller obligation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

use crate::domain::index::{BlogIndex, BlogIndexChangeset};
use crate::infra::codec::{self, CodecError};
use crate::infra::compress;

/// Subdirectory of a division root that holds all index artifacts.
pub const METADATA_DIR: &str = ".brezza";

/// Wire-contract artifact names under the metadata directory.
pub mod file_names {
    pub const VERSION: &str = "index.version";
    pub const FULL: &str = "index.json";
    pub const FULL_COMPRESSED: &str = "index.json.gz";

    pub fn diff(version: u32) -> String {
        format!("index.{version}.diff.json")
    }

    pub fn diff_compressed(version: u32) -> String {
        format!("index.{version}.diff.json.gz")
    }

    /// Extract the embedded version from a diff artifact name.
    ///
    /// Structural parse instead of a regex: the name either matches the
    /// contract exactly or is ignored.
    pub(crate) fn diff_version(file_name: &str) -> Option<u32> {
        file_name
            .strip_prefix("index.")?
            .strip_suffix(".diff.json")?
            .parse()
            .ok()
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("index storage io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Persistence seam for index artifacts at a division root.
#[async_trait]
pub trait IndexStorage: Send + Sync {
    /// Read the version marker. Absence (or an unparseable marker) means no
    /// index has been published yet and reports as version 0, never an error.
    async fn current_version(&self, root: &Path) -> Result<u32, StorageError>;

    /// Persist the serialized index. Writes full JSON, compressed binary and
    /// the version marker in that order; on any failure the marker is left
    /// untouched and the new version is not visible.
    async fn save_index(
        &self,
        root: &Path,
        json: &str,
        binary: &[u8],
        new_version: u32,
    ) -> Result<(), StorageError>;

    /// Read and decode the full JSON artifact. `None` when absent; corrupt
    /// JSON is a hard error.
    async fn try_get_index(&self, root: &Path) -> Result<Option<BlogIndex>, StorageError>;

    /// Persist a changeset (JSON plus gzip), named by its target version.
    async fn save_changeset(
        &self,
        root: &Path,
        changeset: &BlogIndexChangeset,
    ) -> Result<(), StorageError>;

    /// Delete all but the newest `keep_count` changesets, best effort.
    /// Returns the number of changesets removed.
    async fn cleanup_old_changesets(
        &self,
        root: &Path,
        keep_count: usize,
    ) -> Result<usize, StorageError>;
}

/// Filesystem-backed implementation of [`IndexStorage`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FsIndexStorage;

impl FsIndexStorage {
    fn metadata_dir(root: &Path) -> PathBuf {
        root.join(METADATA_DIR)
    }
}

#[async_trait]
impl IndexStorage for FsIndexStorage {
    async fn current_version(&self, root: &Path) -> Result<u32, StorageError> {
        let marker = Self::metadata_dir(root).join(file_names::VERSION);
        match fs::read_to_string(&marker).await {
            Ok(text) => Ok(text.trim().parse().unwrap_or(0)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(err) => Err(err.into()),
        }
    }

    async fn save_index(
        &self,
        root: &Path,
        json: &str,
        binary: &[u8],
        new_version: u32,
    ) -> Result<(), StorageError> {
        let dir = Self::metadata_dir(root);
        fs::create_dir_all(&dir).await?;

        fs::write(dir.join(file_names::FULL), json).await?;
        fs::write(dir.join(file_names::FULL_COMPRESSED), binary).await?;
        // The marker moves last so a partial failure never advertises a
        // version whose artifacts are missing.
        fs::write(dir.join(file_names::VERSION), new_version.to_string()).await?;

        debug!(version = new_version, root = %root.display(), "Saved index artifacts");
        Ok(())
    }

    async fn try_get_index(&self, root: &Path) -> Result<Option<BlogIndex>, StorageError> {
        let full = Self::metadata_dir(root).join(file_names::FULL);
        let json = match fs::read_to_string(&full).await {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(codec::decode_index(&json)?))
    }

    async fn save_changeset(
        &self,
        root: &Path,
        changeset: &BlogIndexChangeset,
    ) -> Result<(), StorageError> {
        let dir = Self::metadata_dir(root);
        fs::create_dir_all(&dir).await?;

        let json = codec::encode_changeset(changeset)?;
        let binary = compress::compress(&json)?;

        fs::write(dir.join(file_names::diff(changeset.to_version)), &json).await?;
        fs::write(
            dir.join(file_names::diff_compressed(changeset.to_version)),
            &binary,
        )
        .await?;

        debug!(
            from_version = changeset.from_version,
            to_version = changeset.to_version,
            root = %root.display(),
            "Saved index changeset"
        );
        Ok(())
    }

    async fn cleanup_old_changesets(
        &self,
        root: &Path,
        keep_count: usize,
    ) -> Result<usize, StorageError> {
        let dir = Self::metadata_dir(root);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(err.into()),
        };

        let mut changesets: Vec<(u32, PathBuf)> = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(version) = file_names::diff_version(name) {
                changesets.push((version, entry.path()));
            }
        }
        changesets.sort_by(|a, b| b.0.cmp(&a.0));

        let mut removed = 0;
        for (version, path) in changesets.into_iter().skip(keep_count) {
            if let Err(err) = fs::remove_file(&path).await {
                warn!(
                    version,
                    path = %path.display(),
                    error = %err,
                    "Failed to delete old changeset, skipping"
                );
                continue;
            }

            let compressed = dir.join(file_names::diff_compressed(version));
            if let Err(err) = fs::remove_file(&compressed).await {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!(
                        version,
                        path = %compressed.display(),
                        error = %err,
                        "Failed to delete compressed changeset"
                    );
                }
            }
            removed += 1;
        }
        Ok(removed)
    }
}

//! Cache configuration.

use std::path::PathBuf;

use serde::Deserialize;

const DEFAULT_TTL_HOURS: i64 = 24;
const DEFAULT_DIR_NAME: &str = "brezza-cache";

/// Settings for the file-backed cache service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding one backing file per cached key.
    pub directory: PathBuf,
    /// Expiration applied when a caller does not supply a TTL.
    pub default_ttl_hours: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            directory: std::env::temp_dir().join(DEFAULT_DIR_NAME),
            default_ttl_hours: DEFAULT_TTL_HOURS,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            directory: settings.directory.clone(),
            default_ttl_hours: settings.default_ttl_hours,
        }
    }
}

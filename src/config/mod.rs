//! Configuration layer: typed settings with layered precedence (file → env).

use std::path::PathBuf;
use std::str::FromStr;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

const LOCAL_CONFIG_BASENAME: &str = "brezza";
const DEFAULT_KEEP_CHANGESETS: usize = 10;
const DEFAULT_CACHE_TTL_HOURS: i64 = 24;
const DEFAULT_CACHE_DIR_NAME: &str = "brezza-cache";

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub index: IndexSettings,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct IndexSettings {
    /// How many historical changeset artifacts to keep per division root.
    pub keep_changesets: usize,
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub directory: PathBuf,
    pub default_ttl_hours: i64,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings with the configured precedence (file → environment).
pub fn load(config_file: Option<&PathBuf>) -> Result<Settings, LoadError> {
    let mut builder =
        Config::builder().add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = config_file {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("BREZZA").separator("__"));

    let raw: RawSettings = builder.build()?.try_deserialize()?;
    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    index: RawIndexSettings,
    cache: RawCacheSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawIndexSettings {
    keep_changesets: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheSettings {
    directory: Option<PathBuf>,
    default_ttl_hours: Option<i64>,
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            logging,
            index,
            cache,
        } = raw;

        Ok(Self {
            logging: build_logging_settings(logging)?,
            index: build_index_settings(index),
            cache: build_cache_settings(cache)?,
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_index_settings(index: RawIndexSettings) -> IndexSettings {
    IndexSettings {
        keep_changesets: index.keep_changesets.unwrap_or(DEFAULT_KEEP_CHANGESETS),
    }
}

fn build_cache_settings(cache: RawCacheSettings) -> Result<CacheSettings, LoadError> {
    let directory = cache
        .directory
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_CACHE_DIR_NAME));
    if directory.as_os_str().is_empty() {
        return Err(LoadError::invalid(
            "cache.directory",
            "path must not be empty",
        ));
    }

    Ok(CacheSettings {
        directory,
        default_ttl_hours: cache.default_ttl_hours.unwrap_or(DEFAULT_CACHE_TTL_HOURS),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");
        assert_eq!(settings.logging.level, LevelFilter::INFO);
        assert!(matches!(settings.logging.format, LogFormat::Compact));
        assert_eq!(settings.index.keep_changesets, 10);
        assert_eq!(settings.cache.default_ttl_hours, 24);
    }

    #[test]
    fn json_flag_switches_log_format() {
        let raw = RawSettings {
            logging: RawLoggingSettings {
                level: Some("debug".to_string()),
                json: Some(true),
            },
            ..Default::default()
        };
        let settings = Settings::from_raw(raw).expect("valid settings");
        assert_eq!(settings.logging.level, LevelFilter::DEBUG);
        assert!(matches!(settings.logging.format, LogFormat::Json));
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let raw = RawSettings {
            logging: RawLoggingSettings {
                level: Some("shout".to_string()),
                json: None,
            },
            ..Default::default()
        };
        assert!(matches!(
            Settings::from_raw(raw),
            Err(LoadError::Invalid { key: "logging.level", .. })
        ));
    }

    #[test]
    fn cache_settings_flow_into_cache_config() {
        let raw = RawSettings {
            cache: RawCacheSettings {
                directory: Some(PathBuf::from("/var/cache/brezza")),
                default_ttl_hours: Some(6),
            },
            ..Default::default()
        };
        let settings = Settings::from_raw(raw).expect("valid settings");
        let cache_config = crate::cache::CacheConfig::from(&settings.cache);
        assert_eq!(cache_config.directory, PathBuf::from("/var/cache/brezza"));
        assert_eq!(cache_config.default_ttl_hours, 6);
    }
}

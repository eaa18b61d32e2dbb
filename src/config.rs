//! Runtime configuration.
//!
//! Layering, lowest to highest precedence: built-in defaults, an optional
//! TOML file, then explicit overrides (environment and command-line flags,
//! resolved by the binary).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::remote::DEFAULT_BASE_URL;

const DEFAULT_CACHE_DIR: &str = ".taskdeck";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the seed API.
    pub api_base_url: String,
    /// Directory holding the persisted cache and session token.
    pub cache_dir: PathBuf,
    pub request_timeout: Duration,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Every field optional; unset fields fall through to the layer below.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    pub api_base_url: Option<String>,
    pub cache_dir: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub log_filter: Option<String>,
}

impl PartialConfig {
    pub fn from_toml_str(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw, path)
    }

    /// Fields set in `self` win over `under`.
    pub fn or(self, under: PartialConfig) -> PartialConfig {
        PartialConfig {
            api_base_url: self.api_base_url.or(under.api_base_url),
            cache_dir: self.cache_dir.or(under.cache_dir),
            timeout_secs: self.timeout_secs.or(under.timeout_secs),
            log_filter: self.log_filter.or(under.log_filter),
        }
    }
}

impl Config {
    /// Resolve `overrides` over the optional file over the defaults.
    pub fn resolve(file: Option<&Path>, overrides: PartialConfig) -> Result<Self, ConfigError> {
        let from_file = match file {
            Some(path) => PartialConfig::from_file(path)?,
            None => PartialConfig::default(),
        };
        Self::from_partial(overrides.or(from_file))
    }

    pub fn from_partial(partial: PartialConfig) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let api_base_url = partial
            .api_base_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);
        if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api_base_url must be an http(s) URL, got `{api_base_url}`"
            )));
        }

        let timeout_secs = partial.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be positive".into()));
        }

        Ok(Config {
            api_base_url,
            cache_dir: partial.cache_dir.unwrap_or(defaults.cache_dir),
            request_timeout: Duration::from_secs(timeout_secs),
            log_filter: partial.log_filter.unwrap_or(defaults.log_filter),
        })
    }
}

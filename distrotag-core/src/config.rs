//! Catalog configuration
//!
//! Read from `config.yaml` in the per-user config directory. Every field is
//! optional; a missing file means defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::DEFAULT_CACHE_TTL;
use crate::error::{CatalogError, CatalogResult};

/// Default release feed (PDC active product versions)
pub const DEFAULT_FEED_URL: &str =
    "https://pdc.fedoraproject.org/rest_api/v1/product-versions/?active=true&page_size=100";

/// File name of the cached feed inside the cache directory
pub const CACHE_FILE_NAME: &str = "product-versions.json";

const CONFIG_FILE_NAME: &str = "config.yaml";

/// Directory name under the platform config and cache roots
const APP_DIR_NAME: &str = "distrotag";

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL.as_secs()
}

/// Where the release feed comes from and how long it is cached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// URL of the active product versions feed
    #[serde(default = "default_feed_url")]
    pub feed_url: String,

    /// Freshness window of the cached feed, in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Cache directory override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_dir: None,
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("org", APP_DIR_NAME, APP_DIR_NAME)
}

impl CatalogConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(path) => Self::load_from_path(&path),
            None => {
                tracing::debug!("No config directory on this platform, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path, defaults when it is absent
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config: {}", path.display()))?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.feed_url.starts_with("http://") && !self.feed_url.starts_with("https://") {
            anyhow::bail!("feed_url must start with http:// or https://");
        }
        if self.cache_ttl_secs == 0 {
            anyhow::bail!("cache_ttl_secs must be greater than zero");
        }
        Ok(())
    }

    /// Path of `config.yaml` in the per-user config directory
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs()
            .map(|dirs| dirs.config_dir().to_path_buf())
            .or_else(|| dirs::config_dir().map(|d| d.join(APP_DIR_NAME)))
            .map(|dir| dir.join(CONFIG_FILE_NAME))
    }

    /// Cache directory: the override, else the per-user cache directory
    pub fn cache_dir(&self) -> CatalogResult<PathBuf> {
        if let Some(dir) = &self.cache_dir {
            return Ok(dir.clone());
        }

        let project = project_dirs().map(|dirs| dirs.cache_dir().to_path_buf());
        platform_cache_dir(project, dirs::cache_dir())
    }

    /// Path of the cached feed file
    pub fn cache_file(&self) -> CatalogResult<PathBuf> {
        Ok(self.cache_dir()?.join(CACHE_FILE_NAME))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// Project cache directory, else `<platform cache root>/distrotag`
///
/// With neither root known the error carries only the relative directory name.
fn platform_cache_dir(
    project: Option<PathBuf>,
    cache_root: Option<PathBuf>,
) -> CatalogResult<PathBuf> {
    project
        .or_else(|| cache_root.map(|root| root.join(APP_DIR_NAME)))
        .ok_or_else(|| CatalogError::CacheUnavailable {
            path: PathBuf::from(APP_DIR_NAME),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no per-user cache directory on this platform, set cache_dir in config.yaml",
            ),
        })
}

//! Graph configuration.
//!
//! Settings are read from a TOML file, by default `~/.facet-graph/config.toml`
//! (`%LOCALAPPDATA%\facet-graph\config.toml` on Windows). The
//! `FACET_GRAPH_CONFIG` environment variable points at a different file. A
//! missing file is not an error: every setting has a default.
//!
//! # File Format
//!
//! ```toml
//! # Prefix resolved against relative resource ids
//! base = "https://example.org/api/"
//!
//! # Preferred language tag when rendering multilingual text
//! language = "en"
//!
//! # How clean() treats falsy facet values: "explicit" or "truthy"
//! retention = "explicit"
//!
//! # HTTP request timeout
//! timeout_secs = 30
//!
//! [eviction]
//! # Omit for an unbounded cache
//! max_entries = 1000
//! ```

use crate::constants::{CONFIG_ENV, DEFAULT_LANGUAGE, DEFAULT_TRANSPORT_TIMEOUT};
use crate::core::GraphError;
use crate::query::Retention;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Settings for a [`Graph`](crate::graph::Graph) and its HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Base URL relative resource ids are resolved against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,

    /// Preferred language tag for multilingual text
    pub language: String,

    /// Retention policy used when cleaning queries
    pub retention: Retention,

    /// HTTP request timeout in seconds
    pub timeout_secs: u64,

    /// Cache eviction settings
    pub eviction: EvictionConfig,
}

/// `[eviction]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvictionConfig {
    /// Maximum number of cached entries; `None` keeps every entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            base: None,
            language: DEFAULT_LANGUAGE.to_string(),
            retention: Retention::default(),
            timeout_secs: DEFAULT_TRANSPORT_TIMEOUT.as_secs(),
            eviction: EvictionConfig::default(),
        }
    }
}

impl GraphConfig {
    /// Load from `FACET_GRAPH_CONFIG` or the default location.
    ///
    /// Returns the defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined, or if the
    /// file exists but cannot be read, parsed or validated.
    pub async fn load() -> Result<Self> {
        Self::load_with_optional(None).await
    }

    /// Load from `path` if given, otherwise as [`load`](Self::load) does.
    ///
    /// Returns the defaults if the file does not exist.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from)) {
            Some(path) => path,
            None => Self::default_path()?,
        };

        if fs::try_exists(&path).await.unwrap_or(false) {
            Self::load_from(&path).await
        } else {
            tracing::debug!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// fails [`validate`](Self::validate).
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .map_err(GraphError::from)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config in {}", path.display()))?;

        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Write to `path` as TOML, creating parent directories.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Default config file location.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("facet-graph")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".facet-graph")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// HTTP request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reject settings no graph can run with.
    pub fn validate(&self) -> Result<(), GraphError> {
        if self.language.trim().is_empty() {
            return Err(GraphError::ConfigError {
                message: "language must not be empty".to_string(),
            });
        }

        if self.timeout_secs == 0 {
            return Err(GraphError::ConfigError {
                message: "timeout_secs must be greater than zero".to_string(),
            });
        }

        if self.eviction.max_entries == Some(0) {
            return Err(GraphError::ConfigError {
                message: "eviction.max_entries must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

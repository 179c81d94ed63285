//! Configuration management for the kitis engine
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::{Category, Role, Source};
use crate::utils::is_absolute_http;
use crate::utils::retry::RetryConfig;

const DEFAULT_BASE: &str = "http://94.72.18.202:8083/";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upstream page locations
    pub links: LinksConfig,

    /// Connection manager tuning
    pub network: NetworkConfig,

    /// HTTP API configuration
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Index URLs for one category, per role
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleLinks {
    pub group: Option<String>,
    pub lecturer: Option<String>,
    pub room: Option<String>,
}

impl RoleLinks {
    fn get(&self, role: Role) -> Option<&str> {
        match role {
            Role::Group => self.group.as_deref(),
            Role::Lecturer => self.lecturer.as_deref(),
            Role::Room => self.room.as_deref(),
        }
    }
}

/// Upstream page locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    /// Base URL relative entity links are resolved against
    pub base: String,

    /// Page requested by the startup liveness probe
    pub probe: String,

    /// Schedule index pages
    pub schedule: RoleLinks,

    /// Records index pages
    pub records: RoleLinks,

    /// Where to write the directory snapshot, if anywhere
    pub snapshot_path: Option<PathBuf>,
}

impl LinksConfig {
    /// Default page layout rooted at `base` (which must end with `/`)
    pub fn rebased(base: &str) -> Self {
        let page = |name: &str| Some(format!("{base}{name}"));
        Self {
            base: base.to_string(),
            probe: format!("{base}index.htm"),
            schedule: RoleLinks {
                group: page("cg.htm"),
                lecturer: page("cp.htm"),
                room: page("ca.htm"),
            },
            records: RoleLinks {
                group: page("vg.htm"),
                lecturer: page("vp.htm"),
                room: None,
            },
            snapshot_path: Some(PathBuf::from("links.json")),
        }
    }

    /// Index page URL for a source, if that source is indexed
    pub fn index_url(&self, source: Source) -> Option<&str> {
        match source.category {
            Category::Schedule => self.schedule.get(source.role),
            Category::Records => self.records.get(source.role),
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self::rebased(DEFAULT_BASE)
    }
}

/// Connection manager tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Attempts per fetch on timeout/connection failure
    pub max_attempts: u32,

    /// Backoff added per retry, in seconds
    pub backoff_step_secs: u64,

    /// Identity rotations the liveness probe may spend on 401/403
    pub max_rotations: u32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            max_attempts: 3,
            backoff_step_secs: 2,
            max_rotations: 10,
        }
    }
}

/// HTTP API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the API listens on
    pub bind_address: SocketAddr,

    /// Allow cross-origin requests
    pub enable_cors: bool,

    /// Log every request via tower-http
    pub enable_request_logging: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 5000)),
            enable_cors: true,
            enable_request_logging: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables keep their defaults. When `KITIS_BASE_URL` is set, the
    /// default index pages are re-rooted onto it.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(base) = std::env::var("KITIS_BASE_URL") {
            let base = if base.ends_with('/') { base } else { format!("{base}/") };
            config.links = LinksConfig::rebased(&base);
        }
        if let Ok(probe) = std::env::var("KITIS_PROBE_URL") {
            config.links.probe = probe;
        }
        if let Ok(path) = std::env::var("KITIS_SNAPSHOT_PATH") {
            config.links.snapshot_path = (!path.is_empty()).then(|| PathBuf::from(path));
        }

        if let Some(v) = env_parse("KITIS_REQUEST_TIMEOUT") {
            config.network.timeout_secs = v;
        }
        if let Some(v) = env_parse("KITIS_MAX_ATTEMPTS") {
            config.network.max_attempts = v;
        }
        if let Some(v) = env_parse("KITIS_BACKOFF_STEP") {
            config.network.backoff_step_secs = v;
        }
        if let Some(v) = env_parse("KITIS_MAX_ROTATIONS") {
            config.network.max_rotations = v;
        }
        if let Some(v) = env_parse("KITIS_BIND_ADDRESS") {
            config.server.bind_address = v;
        }
        if let Ok(level) = std::env::var("KITIS_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(format) = std::env::var("KITIS_LOG_FORMAT") {
            config.logging.format = format;
        }

        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !is_absolute_http(&self.links.base) {
            anyhow::bail!("links.base must be an absolute http(s) URL: {}", self.links.base);
        }

        if !is_absolute_http(&self.links.probe) {
            anyhow::bail!("links.probe must be an absolute http(s) URL: {}", self.links.probe);
        }

        for source in Source::all() {
            if let Some(url) = self.links.index_url(source) {
                if !is_absolute_http(url) {
                    anyhow::bail!("index URL for {source} must be absolute: {url}");
                }
            }
        }

        if self.network.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than 0");
        }

        if self.network.max_attempts == 0 {
            anyhow::bail!("max_attempts must be greater than 0");
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!("log format must be text or json, got {}", self.logging.format);
        }

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.network.timeout_secs)
    }

    /// Retry policy for timeouts and connection failures
    #[must_use]
    pub fn retry(&self) -> RetryConfig {
        RetryConfig::with_step(
            self.network.max_attempts,
            Duration::from_secs(self.network.backoff_step_secs),
        )
    }
}

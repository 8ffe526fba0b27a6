use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub cache: CacheConfig,

    pub search: SearchConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/goodcorner.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 4000,
            cors_allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

/// Which key-value store backs the search cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Redis,
    Database,
    Memory,
    Disabled,
}

impl CacheBackend {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Redis => "redis",
            Self::Database => "database",
            Self::Memory => "memory",
            Self::Disabled => "disabled",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,

    pub redis_url: String,

    /// Expiration applied to every search entry (default: 600)
    pub ttl_seconds: u64,

    /// Upper bound for a single cache get/set before it counts as a failure
    pub operation_timeout_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Redis,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            ttl_seconds: constants::cache::SEARCH_TTL_SECONDS,
            operation_timeout_ms: constants::cache::OPERATION_TIMEOUT_MS,
        }
    }
}

/// Row ordering applied to text search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchOrder {
    /// Whatever order the database returns.
    #[default]
    Unordered,
    Newest,
    Oldest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub order: SearchOrder,

    /// Row cap for text search. `None` returns every match.
    pub max_results: Option<u64>,

    /// Row cap for the plain ad listing (default: 20)
    pub listing_limit: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            order: SearchOrder::Unordered,
            max_results: None,
            listing_limit: constants::limits::DEFAULT_LISTING_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    /// Emit logs as JSON lines instead of the human-readable format
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            json_logs: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("goodcorner").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".goodcorner").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache.backend == CacheBackend::Redis && self.cache.redis_url.is_empty() {
            anyhow::bail!("Redis URL cannot be empty when the redis cache backend is selected");
        }

        if self.cache.backend != CacheBackend::Disabled && self.cache.ttl_seconds == 0 {
            anyhow::bail!("Cache TTL must be > 0 (use backend = \"disabled\" to turn caching off)");
        }

        if self.cache.ttl_seconds > constants::cache::MAX_TTL_SECONDS {
            anyhow::bail!(
                "Cache TTL must be <= {} seconds",
                constants::cache::MAX_TTL_SECONDS
            );
        }

        if self.cache.operation_timeout_ms == 0 {
            anyhow::bail!("Cache operation timeout must be > 0");
        }

        if self.search.listing_limit == 0 {
            anyhow::bail!("Listing limit must be > 0");
        }

        if self.search.max_results == Some(0) {
            anyhow::bail!("Search max_results must be > 0 when set");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.cache.ttl_seconds, 600);
        assert_eq!(config.cache.backend, CacheBackend::Redis);
        assert_eq!(config.search.listing_limit, 20);
        assert_eq!(config.search.max_results, None);
        assert_eq!(config.search.order, SearchOrder::Unordered);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[cache]"));
        assert!(toml_str.contains("backend = \"redis\""));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [cache]
            backend = "memory"
            ttl_seconds = 30

            [search]
            order = "newest"
            max_results = 50
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert_eq!(config.cache.ttl_seconds, 30);
        assert_eq!(config.search.order, SearchOrder::Newest);
        assert_eq!(config.search.max_results, Some(50));

        assert_eq!(config.cache.redis_url, "redis://127.0.0.1:6379");
        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn test_validate_rejects_zero_ttl() {
        let mut config = Config::default();
        config.cache.ttl_seconds = 0;
        assert!(config.validate().is_err());

        config.cache.backend = CacheBackend::Disabled;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bounds_ttl_and_timeout() {
        let mut config = Config::default();
        config.cache.ttl_seconds = constants::cache::MAX_TTL_SECONDS;
        assert!(config.validate().is_ok());

        config.cache.ttl_seconds = u64::MAX / 2;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.cache.operation_timeout_ms = 0;
        assert!(config.validate().is_err());
    }
}

//! Configuration loading for swipedeck-server.
//!
//! Configuration is loaded from a TOML file (default: `server.toml`).
//! Every section and key is optional.

use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration for swipedeck-server.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Feed pagination configuration.
    #[serde(default)]
    pub feed: FeedConfig,
    /// Demo data configuration.
    #[serde(default)]
    pub seed: SeedConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP listener (default: 0.0.0.0:8080).
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to SQLite database file.
    #[serde(default = "default_database_path")]
    pub database: PathBuf,
}

/// Feed pagination configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Page size when the request gives none (default: 10).
    #[serde(default = "default_limit")]
    pub default_limit: u32,
    /// Largest page size a request may ask for (default: 50).
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,
}

/// Demo data configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    /// Prefix for seeded photo URLs.
    #[serde(default = "default_asset_base_url")]
    pub asset_base_url: String,
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_database_path() -> PathBuf {
    PathBuf::from("swipedeck.db")
}

fn default_limit() -> u32 {
    10
}

fn default_max_limit() -> u32 {
    50
}

fn default_asset_base_url() -> String {
    "http://localhost:8080/assets".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: default_database_path(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            asset_base_url: default_asset_base_url(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.storage.database, PathBuf::from("swipedeck.db"));
        assert_eq!(config.feed.default_limit, 10);
        assert_eq!(config.feed.max_limit, 50);
    }

    #[test]
    fn config_from_toml_string() {
        let toml = r#"
[server]
bind_address = "127.0.0.1:5000"

[storage]
database = "/data/people.db"

[feed]
max_limit = 20

[seed]
asset_base_url = "http://cdn.test/img"
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:5000");
        assert_eq!(config.storage.database, PathBuf::from("/data/people.db"));
        assert_eq!(config.feed.default_limit, 10);
        assert_eq!(config.feed.max_limit, 20);
        assert_eq!(config.seed.asset_base_url, "http://cdn.test/img");
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.feed.max_limit, 50);
    }

    #[test]
    fn from_file_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[feed]\nmax_limit = \"lots\"").unwrap();

        let result = Config::from_file(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn from_file_reports_missing_file() {
        let result = Config::from_file(std::path::Path::new("/nonexistent/server.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }
}

//! Server configuration
//!
//! Loads and parses strainhub-server.toml with database, execution engine,
//! identity provider, object storage, and algorithm data settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Parse(toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server identification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfoConfig {
    /// Server name for identification (displayed to clients)
    #[serde(default = "default_server_name")]
    pub name: String,
}

impl Default for ServerInfoConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
        }
    }
}

fn default_server_name() -> String {
    "strainhub-server".to_string()
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database file path
    pub path: String,
}

/// Execution engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Base URL of the engine's REST API, e.g. "http://localhost:8000/"
    pub base_url: String,
    /// Cloud project jobs are billed to (carried on every workflow record)
    pub project_id: String,
}

/// Identity provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Token verification endpoint, e.g. "https://oauth2.googleapis.com/tokeninfo"
    pub tokeninfo_url: String,
    /// OAuth client id tokens must be audience-scoped to
    pub client_id: String,
}

/// Object storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base URL of the storage JSON API, e.g. "https://storage.googleapis.com/storage/v1"
    pub base_url: String,
}

/// Algorithm data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Root directory holding WDL scripts, name-mapping tables, species
    /// lists, and phylogenetic trees
    pub algorithm_dir: String,
}

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server identification
    #[serde(default)]
    pub server: ServerInfoConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Execution engine configuration
    pub engine: EngineConfig,
    /// Identity provider configuration
    pub identity: IdentityConfig,
    /// Object storage configuration
    pub storage: StorageConfig,
    /// Algorithm data configuration
    pub data: DataConfig,
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Read)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }

    /// Load configuration from the default location or environment
    ///
    /// Searches for config in:
    /// 1. CONFIG_PATH environment variable
    /// 2. ./config/strainhub-server.toml
    /// 3. ./strainhub-server.toml
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(config_path) = std::env::var("CONFIG_PATH") {
            return Self::from_file(config_path);
        }

        let paths = [
            PathBuf::from("config/strainhub-server.toml"),
            PathBuf::from("./strainhub-server.toml"),
        ];

        for path in &paths {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        Err(ConfigError::Invalid(
            "No configuration file found; set CONFIG_PATH or place config/strainhub-server.toml"
                .to_string(),
        ))
    }

    /// SQLite connection string for the configured database path
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.database.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [server]
        name = "strainhub-test"

        [database]
        path = "strainhub.db"

        [engine]
        base_url = "http://localhost:8000/"
        project_id = "grand-bridge-276413"

        [identity]
        tokeninfo_url = "https://oauth2.googleapis.com/tokeninfo"
        client_id = "client-id.apps.googleusercontent.com"

        [storage]
        base_url = "https://storage.googleapis.com/storage/v1"

        [data]
        algorithm_dir = "./algorithm"
    "#;

    #[test]
    fn test_parse_full_config() {
        let config = ServerConfig::from_str(SAMPLE).unwrap();
        assert_eq!(config.server.name, "strainhub-test");
        assert_eq!(config.engine.project_id, "grand-bridge-276413");
        assert_eq!(config.database_url(), "sqlite:strainhub.db?mode=rwc");
    }

    #[test]
    fn test_server_section_is_optional() {
        let without_server = SAMPLE
            .lines()
            .filter(|l| !l.contains("[server]") && !l.contains("strainhub-test"))
            .collect::<Vec<_>>()
            .join("\n");

        let config = ServerConfig::from_str(&without_server).unwrap();
        assert_eq!(config.server.name, "strainhub-server");
    }

    #[test]
    fn test_parse_error_reported() {
        let err = ServerConfig::from_str("not valid toml [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}

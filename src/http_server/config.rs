//! Service Configuration
//!
//! Bind address, CORS, REST base path, store connection and the two
//! compatibility switches. Loaded from a JSON file; every field has a default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::records::FindPolicy;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 3000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins (default: empty, any origin)
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Path the collection endpoints are mounted under (default: "/cms")
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// Document store connection string (default: "memory://cms")
    #[serde(default = "default_connection_string")]
    pub connection_string: String,

    /// Collection exposed by the API (default: "nest")
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Whether `?script=1` skips the injection guard (default: true)
    #[serde(default = "default_true")]
    pub allow_script_bypass: bool,

    /// Whether a find with zero matches answers 404 (default: true)
    #[serde(default = "default_true")]
    pub empty_find_is_not_found: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_base_path() -> String {
    "/cms".to_string()
}

fn default_connection_string() -> String {
    "memory://cms".to_string()
}

fn default_collection() -> String {
    "nest".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            base_path: default_base_path(),
            connection_string: default_connection_string(),
            collection: default_collection(),
            allow_script_bypass: true,
            empty_find_is_not_found: true,
        }
    }
}

impl ServiceConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Load and validate configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config: ServiceConfig = serde_json::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Like [`ServiceConfig::load`], but a missing file yields the defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Invalid("port must be > 0".to_string()));
        }

        if !self.base_path.starts_with('/') || self.base_path.ends_with('/') {
            return Err(ConfigError::Invalid(format!(
                "base_path must start with '/' and must not end with '/': '{}'",
                self.base_path
            )));
        }

        if self.collection.trim().is_empty() {
            return Err(ConfigError::Invalid("collection must not be empty".to_string()));
        }

        if self.connection_string.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "connection_string must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn find_policy(&self) -> FindPolicy {
        FindPolicy::from_flag(self.empty_find_is_not_found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.base_path, "/cms");
        assert!(config.allow_script_bypass);
        assert_eq!(config.find_policy(), FindPolicy::EmptyIsNotFound);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = ServiceConfig::with_port(8080);
        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_load_partial_file() {
        let file = write_config(
            r#"{"port": 4000, "base_path": "/v1/nest", "empty_find_is_not_found": false}"#,
        );
        let config = ServiceConfig::load(file.path()).unwrap();

        assert_eq!(config.port, 4000);
        assert_eq!(config.base_path, "/v1/nest");
        assert_eq!(config.collection, "nest");
        assert_eq!(config.find_policy(), FindPolicy::EmptyIsSuccess);
    }

    #[test]
    fn test_load_invalid_json() {
        let file = write_config("{port: }");
        assert!(matches!(
            ServiceConfig::load(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_rejects_bad_base_path() {
        let file = write_config(r#"{"base_path": "cms/"}"#);
        assert!(matches!(
            ServiceConfig::load(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        assert!(matches!(
            ServiceConfig::load(&path),
            Err(ConfigError::Read { .. })
        ));
        assert_eq!(
            ServiceConfig::load_or_default(&path).unwrap(),
            ServiceConfig::default()
        );
    }
}

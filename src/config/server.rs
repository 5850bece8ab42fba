//! Application configuration loaded from `config.toml`.
//!
//! The file is optional; every setting has a sensible default so the service
//! can start from environment variables alone.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::{fs, path::Path};

/// Top-level application configuration.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// HTTP server settings.
#[derive(Deserialize, Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string for the TCP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8080
}

/// Parses a config file at `path`.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;
    let app_config: AppConfig = toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse TOML from config file {path_ref:?}: {e}"),
    })?;
    Ok(app_config)
}

/// Loads `config.toml` from the working directory, falling back to defaults
/// when the file is absent.
pub fn load_app_configuration() -> Result<AppConfig> {
    match load_config("config.toml") {
        Ok(config) => Ok(config),
        Err(Error::Config { message }) if message.contains("Failed to read") => {
            tracing::info!("No config.toml found, using defaults");
            Ok(AppConfig::default())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: AppConfig = toml::from_str("[server]\nport = 3000\n").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
    }
}

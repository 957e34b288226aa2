//! Server configuration read from the environment.
//!
//! `HOST` (default `0.0.0.0`), `PORT` (default `8080`) and `DATA_FILE` (optional
//! JSON snapshot of all events; without it events live in memory only).

use std::path::PathBuf;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    InvalidPort(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidPort(v) => write!(f, "PORT must be a number 0-65535, got {:?}", v),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            data_file: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the environment in production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let host = lookup("HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or(defaults.host);
        let port: u16 = match lookup("PORT") {
            Some(p) => p
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(p.clone()))?,
            None => defaults.port,
        };
        let data_file = lookup("DATA_FILE")
            .filter(|f| !f.trim().is_empty())
            .map(PathBuf::from);
        Ok(Self {
            host,
            port,
            data_file,
        })
    }
}

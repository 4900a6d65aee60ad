//! Runtime configuration.
//!
//! Values come from the environment (`Config::load`) or a YAML file
//! (`Config::from_file`); the binary layers command-line flags on top.

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:4221";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub files: FilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Upper bound on concurrently served connections, at least 1. `None`
    /// admits every accepted connection.
    pub max_connections: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            max_connections: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Base directory for `/files/` routes. Absent disables them.
    pub directory: Option<PathBuf>,
}

impl Config {
    /// Builds a config from `LISTEN`, `DIRECTORY` and `MAX_CONNECTIONS`.
    pub fn load() -> Result<Self, ConfigError> {
        let listen_addr =
            std::env::var("LISTEN")
                .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string());

        let directory = std::env::var("DIRECTORY")
            .ok()
            .filter(|d| !d.is_empty())
            .map(PathBuf::from);

        let max_connections = match std::env::var("MAX_CONNECTIONS") {
            Ok(v) => match v.parse::<usize>() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "MAX_CONNECTIONS",
                        value: v,
                    });
                }
            },
            Err(_) => None,
        };

        Ok(Self {
            server: ServerConfig { listen_addr, max_connections },
            files: FilesConfig { directory },
        })
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let mut cfg: Config = serde_yaml::from_str(s)?;
        cfg.normalize();
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.max_connections == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "server.max_connections",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    // An empty directory string means the same as no directory.
    fn normalize(&mut self) {
        if self
            .files
            .directory
            .as_ref()
            .is_some_and(|d| d.as_os_str().is_empty())
        {
            self.files.directory = None;
        }
    }
}

//! Configuration management

use anyhow::bail;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Where the teacher routes are mounted
    #[serde(default = "default_base_path")]
    pub base_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            base_path: default_base_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum StorageConfig {
    #[serde(rename = "ephemeral")]
    Ephemeral,

    #[serde(rename = "sqlite")]
    Sqlite {
        #[serde(default = "default_sqlite_path")]
        path: PathBuf,

        #[serde(default = "default_collection")]
        collection: String,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Ephemeral
    }
}

impl StorageConfig {
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self::Sqlite {
            path: path.into(),
            collection: default_collection(),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Ephemeral => "ephemeral (in-memory)".to_string(),
            Self::Sqlite { path, collection } => {
                format!("sqlite ({}, collection {})", path.display(), collection)
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_port() -> u16 {
    8016
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_base_path() -> String {
    "/api/v1/teachers".to_string()
}

fn default_sqlite_path() -> PathBuf {
    PathBuf::from("roster.db")
}

fn default_collection() -> String {
    "teachers".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Without an explicit path an optional `roster.toml` in the working
    /// directory is read. `ROSTER_SERVER__PORT=9000` style variables
    /// override file values.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("roster").required(false),
        };

        let config = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("ROSTER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(config.try_deserialize::<Config>()?)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let base = &self.server.base_path;
        if !base.starts_with('/') || base.len() < 2 || base.ends_with('/') {
            bail!("server.base_path must start with '/' and must not end with '/': {base:?}");
        }
        if base.contains(':') || base.contains('*') {
            bail!("server.base_path must not contain route parameters: {base:?}");
        }
        if base == "/health" {
            bail!("server.base_path collides with the health endpoint");
        }
        Ok(())
    }
}

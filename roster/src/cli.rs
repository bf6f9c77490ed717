//! Command-line flags

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{Config, StorageConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageKind {
    Ephemeral,
    Sqlite,
}

/// Flags override values from `roster.toml` and `ROSTER_*__*` variables.
#[derive(Parser, Debug, Default)]
#[command(name = "roster")]
#[command(about = "REST service for the teachers collection", long_about = None)]
pub struct Args {
    /// Configuration file (defaults to ./roster.toml when present)
    #[arg(short, long, env = "ROSTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "ROSTER_PORT")]
    pub port: Option<u16>,

    /// Host to bind to
    #[arg(long, env = "ROSTER_HOST")]
    pub host: Option<String>,

    /// Path the teacher routes are mounted under
    #[arg(long, env = "ROSTER_BASE_PATH")]
    pub base_path: Option<String>,

    /// Storage backend
    #[arg(long, value_enum, env = "ROSTER_STORAGE_BACKEND")]
    pub storage: Option<StorageKind>,

    /// SQLite database file (implies --storage sqlite)
    #[arg(long, env = "ROSTER_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "ROSTER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, env = "ROSTER_LOG_JSON")]
    pub log_json: bool,
}

impl Args {
    pub fn apply(&self, config: &mut Config) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        if let Some(base_path) = &self.base_path {
            config.server.base_path.clone_from(base_path);
        }
        if let Some(level) = &self.log_level {
            config.log.level.clone_from(level);
        }
        if self.log_json {
            config.log.json = true;
        }

        let wants_sqlite = match self.storage {
            Some(StorageKind::Ephemeral) => {
                config.storage = StorageConfig::Ephemeral;
                return;
            }
            Some(StorageKind::Sqlite) => true,
            None => self.data_file.is_some(),
        };

        if wants_sqlite {
            if !matches!(config.storage, StorageConfig::Sqlite { .. }) {
                config.storage = StorageConfig::sqlite("roster.db");
            }
            if let (Some(file), StorageConfig::Sqlite { path, .. }) =
                (&self.data_file, &mut config.storage)
            {
                path.clone_from(file);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("roster").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_flags_keep_config() {
        let mut config = Config::default();
        config.server.port = 9000;

        Args::default().apply(&mut config);

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.storage, StorageConfig::Ephemeral);
    }

    #[test]
    fn test_flags_override() {
        let args = parse(&[
            "--port",
            "9001",
            "--host",
            "127.0.0.1",
            "--base-path",
            "/staff",
            "--log-level",
            "debug",
            "--log-json",
        ]);
        let mut config = Config::default();
        args.apply(&mut config);

        assert_eq!(config.server.port, 9001);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.base_path, "/staff");
        assert_eq!(config.log.level, "debug");
        assert!(config.log.json);
    }

    #[test]
    fn test_data_file_implies_sqlite() {
        let mut config = Config::default();
        parse(&["--data-file", "/var/lib/roster/school.db"]).apply(&mut config);

        assert_eq!(
            config.storage,
            StorageConfig::sqlite("/var/lib/roster/school.db")
        );
    }

    #[test]
    fn test_sqlite_keeps_configured_collection() {
        let mut config = Config::default();
        config.storage = StorageConfig::Sqlite {
            path: PathBuf::from("a.db"),
            collection: "staff".to_string(),
        };

        parse(&["--storage", "sqlite", "--data-file", "b.db"]).apply(&mut config);

        assert_eq!(
            config.storage,
            StorageConfig::Sqlite {
                path: PathBuf::from("b.db"),
                collection: "staff".to_string(),
            }
        );
    }

    #[test]
    fn test_ephemeral_flag_wins() {
        let mut config = Config::default();
        config.storage = StorageConfig::sqlite("a.db");

        parse(&["--storage", "ephemeral"]).apply(&mut config);

        assert_eq!(config.storage, StorageConfig::Ephemeral);
    }
}

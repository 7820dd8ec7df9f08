//! Server configuration.
//!
//! Values come from, lowest precedence first: built-in defaults, an optional
//! TOML file, then environment variables and command-line flags.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use catalog_observability::{LogFormat, LoggingConfig};
use clap::Parser;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// SQLite database file. Empty means a private in-memory database.
    pub db_file: String,
    /// HTTP port.
    pub port: u16,
    /// Address to bind.
    pub bind_address: String,
    /// Remove the database file before opening it.
    pub fresh_start: bool,
    /// Insert the starter catalog on startup.
    pub seed: bool,
    /// Per-request timeout, in seconds.
    pub request_timeout_secs: u64,
    pub logging: LoggingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_file: String::new(),
            port: 8080,
            bind_address: "0.0.0.0".into(),
            fresh_start: true,
            seed: true,
            request_timeout_secs: 15,
            logging: LoggingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Check values that cannot be caught by deserialization.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs",
                reason: "must be greater than zero".into(),
            });
        }
        self.socket_addr()?;
        Ok(())
    }

    /// Address to listen on.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_address, self.port)
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                field: "bind_address",
                reason: e.to_string(),
            })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Catalog server - product catalog with discount pricing
#[derive(Parser, Debug, Default)]
#[command(name = "catalog-server")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// SQLite database file; empty for in-memory
    #[arg(long, env = "DB_FILE")]
    pub db_file: Option<String>,

    /// HTTP port
    #[arg(long, env = "HTTP_PORT")]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "BIND_ADDRESS")]
    pub bind_address: Option<String>,

    /// Log level or filter directive
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log format: pretty or json
    #[arg(long, env = "LOG_FORMAT")]
    pub log_format: Option<String>,

    /// Keep an existing database file instead of starting fresh
    #[arg(long)]
    pub keep_db: bool,

    /// Do not insert the starter catalog
    #[arg(long)]
    pub no_seed: bool,
}

impl Cli {
    /// Resolve the effective configuration.
    pub fn load_config(&self) -> Result<ServerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };
        self.apply(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    fn apply(&self, config: &mut ServerConfig) -> Result<(), ConfigError> {
        if let Some(db_file) = &self.db_file {
            config.db_file = db_file.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(bind_address) = &self.bind_address {
            config.bind_address = bind_address.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.logging.format = format
                .parse::<LogFormat>()
                .map_err(|reason| ConfigError::InvalidValue {
                    field: "log_format",
                    reason,
                })?;
        }
        if self.keep_db {
            config.fresh_start = false;
        }
        if self.no_seed {
            config.seed = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.db_file, "");
        assert_eq!(config.port, 8080);
        assert!(config.fresh_start);
        assert!(config.seed);
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ServerConfig::from_toml(
            r#"
            db_file = "catalog.db"
            port = 9000

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.db_file, "catalog.db");
        assert_eq!(config.port, 9000);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.request_timeout_secs, 15);
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            ServerConfig::from_toml("port = \"eighty\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_flags_override_file_values() {
        let cli = Cli {
            port: Some(3000),
            log_format: Some("json".into()),
            no_seed: true,
            keep_db: true,
            ..Cli::default()
        };
        let mut config = ServerConfig::default();
        cli.apply(&mut config).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(!config.seed);
        assert!(!config.fresh_start);
    }

    #[test]
    fn test_invalid_values() {
        let cli = Cli {
            log_format: Some("xml".into()),
            ..Cli::default()
        };
        assert!(cli.apply(&mut ServerConfig::default()).is_err());

        let config = ServerConfig {
            request_timeout_secs: 0,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ServerConfig {
            bind_address: "not an address".into(),
            ..ServerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "bind_address", .. })
        ));
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from(["catalog-server", "--port", "8181", "--no-seed"]);
        assert_eq!(cli.port, Some(8181));
        assert!(cli.no_seed);
    }
}

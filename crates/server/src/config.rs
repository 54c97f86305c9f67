//! Daemon configuration via `mpdb.toml`
//!
//! Every field has a default, so an empty file (or no file) yields the stock
//! daemon: port 3000 on all interfaces, snapshot at `data/mpdb_data.json`.
//! Command-line flags override file values.

use std::path::{Path, PathBuf};

use mpdb_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "mpdb.toml";

/// Daemon configuration loaded from `mpdb.toml`.
///
/// # Example
///
/// ```toml
/// bind = "0.0.0.0"
/// port = 3000
/// data_file = "data/mpdb_data.json"
/// max_connections = 1024
/// log_level = "info"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to listen on.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// TCP port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Snapshot file path.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// Keep data in memory only; `data_file` is ignored.
    #[serde(default)]
    pub ephemeral: bool,
    /// Maximum concurrently served connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
    /// `tracing` filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_data_file() -> PathBuf {
    PathBuf::from("data").join("mpdb_data.json")
}

fn default_max_connections() -> usize {
    1024
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            data_file: default_data_file(),
            ephemeral: false,
            max_connections: default_max_connections(),
            log_level: default_log_level(),
        }
    }
}

impl ServerConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# MPDB daemon configuration

# Interface and port to listen on
bind = "0.0.0.0"
port = 3000

# Snapshot file, rewritten after every mutation
data_file = "data/mpdb_data.json"

# Keep everything in memory, never touch data_file (default: false)
ephemeral = false

# Connections served at once; further clients wait to be accepted
max_connections = 1024

# Log filter, e.g. "info" or "mpdb_engine=debug,info". RUST_LOG overrides it.
log_level = "info"
"#
    }

    /// `bind:port`
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    /// Check values serde cannot.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero connection limit or a bad log filter.
    pub fn validate(&self) -> Result<()> {
        if self.max_connections == 0 {
            return Err(Error::invalid_argument(
                "max_connections must be at least 1 in mpdb.toml.",
            ));
        }
        EnvFilter::try_new(&self.log_level).map_err(|e| {
            Error::invalid_argument(format!(
                "Invalid log_level '{}' in mpdb.toml: {}",
                self.log_level, e
            ))
        })?;
        Ok(())
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::invalid_argument(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: ServerConfig = toml::from_str(&content).map_err(|e| {
            Error::invalid_argument(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }
}

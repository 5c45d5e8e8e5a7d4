//! Server configuration
//!
//! Settings are layered, later layers winning:
//!
//! 1. built-in defaults
//! 2. a TOML file (`--config`, else `shopping-list.toml` in the working directory)
//! 3. the `HOST`, `PORT` and `DATABASE_URL` environment variables
//! 4. command-line flags (applied by the binary)
//!
//! ```toml
//! port = 8080
//! database_url = "file://shopping-list.json"
//! workers = 4
//! static_dir = "public"
//!
//! [api]
//! mutation_status = "ok"        # or "no_content"
//! missing_delete = "succeed"    # or "not_found"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::ApiPolicy;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "shopping-list.toml";

/// Default store connection string
pub const DEFAULT_DATABASE_URL: &str = "file://shopping-list.json";

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The config file is not valid TOML for this schema
    #[error("invalid config file {path}: {source}")]
    Parse {
        /// Config file path
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: toml::de::Error,
    },

    /// An environment variable held an unusable value
    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv {
        /// Variable name
        name: &'static str,
        /// Raw value
        value: String,
    },

    /// The worker count was zero
    #[error("workers must be at least 1")]
    InvalidWorkers,
}

/// Complete server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Interface to listen on
    pub host: String,
    /// Port to listen on (0 picks a free port)
    pub port: u16,
    /// Store connection string (`memory:`, `file://path`, or a bare path)
    pub database_url: String,
    /// Number of request worker threads
    pub workers: usize,
    /// Directory of static files served next to the API
    pub static_dir: Option<PathBuf>,
    /// Response policies
    pub api: ApiPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            workers: 4,
            static_dir: None,
            api: ApiPolicy::default(),
        }
    }
}

impl ServerConfig {
    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load a config file
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the explicit config file, or the default one if present
    ///
    /// An explicit path must exist. A missing default file yields the
    /// built-in defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            log::debug!("Loading config from {}", path.display());
            return Self::load_file(path);
        }
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            log::debug!("Loading config from {DEFAULT_CONFIG_FILE}");
            return Self::load_file(default_path);
        }
        Ok(Self::default())
    }

    /// Apply `HOST`, `PORT` and `DATABASE_URL` using `lookup` to read them
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST").filter(|v| !v.is_empty()) {
            self.host = host;
        }
        if let Some(port) = lookup("PORT").filter(|v| !v.is_empty()) {
            self.port = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: "PORT",
                value: port.clone(),
            })?;
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
            self.database_url = url;
        }
        Ok(())
    }

    /// Apply overrides from the process environment
    pub fn apply_process_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env(|name| std::env::var(name).ok())
    }

    /// Check cross-field constraints
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::InvalidWorkers);
        }
        Ok(())
    }

    /// Address string handed to the listener
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

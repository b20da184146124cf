//! Configuration file parsing for the server.
//!
//! Settings come from `config/<env>.toml`, where `<env>` is taken from
//! the `GOPHERNET_ENV` environment variable. The file supplies the listen
//! port, logger settings and the endpoint path map.

use gophernet_scheduler::SchedulerConfig;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable selecting the configuration file
pub const ENV_VAR: &str = "GOPHERNET_ENV";

/// Environment used when [`ENV_VAR`] is unset
pub const DEFAULT_ENV: &str = "local";

/// Directory holding one TOML file per environment
pub const CONFIG_DIR: &str = "config";

/// Endpoint key for listing burrows
pub const GET_BURROWS: &str = "get-burrows";

/// Endpoint key for renting a burrow
pub const RENT_BURROW: &str = "rent-burrow";

/// Endpoint key for the report
pub const GET_REPORT: &str = "get-report";

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file {}: {source}", .path.display())]
    FileRead {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Required endpoint missing from `[rest.endpoints]`
    #[error("Missing required endpoint: {0}")]
    MissingEndpoint(&'static str),

    /// Endpoint path does not start with '/'
    #[error("Invalid path for endpoint {endpoint}: {path:?}")]
    InvalidPath {
        /// Endpoint key
        endpoint: &'static str,
        /// Configured path
        path: String,
    },

    /// Two endpoints share a path
    #[error("Path {0:?} is configured for more than one endpoint")]
    DuplicatePath(String),
}

/// Service configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Listener settings
    #[serde(default)]
    pub server: ServerSettings,

    /// Logger settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Output file locations
    #[serde(default)]
    pub files: FilesConfig,

    /// Scheduled job intervals
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// REST endpoint map
    pub rest: RestConfig,
}

/// Listener settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Bind address (e.g., "0.0.0.0")
    pub host: String,

    /// Listen port
    pub port: u16,

    /// How long shutdown waits for scheduled jobs (milliseconds)
    pub shutdown_timeout_ms: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout_ms: 500,
        }
    }
}

impl ServerSettings {
    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

/// Logger settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (e.g., "info" or "gophernet_store=debug").
    /// `RUST_LOG` takes precedence when set.
    pub level: String,

    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line human readable
    Pretty,
    /// Single-line human readable
    Compact,
    /// Newline-delimited JSON
    Json,
}

/// Output file locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Where the periodic report is written
    pub report_file: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            report_file: PathBuf::from("data/report.txt"),
        }
    }
}

/// REST endpoint map
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestConfig {
    /// Endpoints keyed by name
    #[serde(default)]
    pub endpoints: HashMap<String, Endpoint>,
}

/// Single endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct Endpoint {
    /// HTTP method, informational only; handlers fix their own method
    #[serde(default)]
    pub method: String,

    /// Route path
    pub path: String,
}

/// Resolved route paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    /// GET list of burrows
    pub get_burrows: String,
    /// POST rent request
    pub rent_burrow: String,
    /// GET report
    pub get_report: String,
}

impl ServiceConfig {
    /// Load configuration from `path`, or from the environment-selected
    /// file when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::from_file(Self::env_config_path()),
        }
    }

    /// Path of the configuration file for the current environment
    pub fn env_config_path() -> PathBuf {
        let env = std::env::var(ENV_VAR).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        Self::config_path_for(&env)
    }

    /// Path of the configuration file for `env`
    pub fn config_path_for(env: &str) -> PathBuf {
        Path::new(CONFIG_DIR).join(format!("{env}.toml"))
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: ServiceConfig = toml::from_str(contents)?;

        // Validate the endpoint map up front
        config.routes()?;

        Ok(config)
    }

    /// Resolve the three endpoint paths
    pub fn routes(&self) -> Result<Routes, ConfigError> {
        let routes = Routes {
            get_burrows: self.endpoint_path(GET_BURROWS)?,
            rent_burrow: self.endpoint_path(RENT_BURROW)?,
            get_report: self.endpoint_path(GET_REPORT)?,
        };

        let mut seen = HashSet::new();
        for path in [&routes.get_burrows, &routes.rent_burrow, &routes.get_report] {
            if !seen.insert(path) {
                return Err(ConfigError::DuplicatePath(path.clone()));
            }
        }

        Ok(routes)
    }

    fn endpoint_path(&self, key: &'static str) -> Result<String, ConfigError> {
        let endpoint = self
            .rest
            .endpoints
            .get(key)
            .ok_or(ConfigError::MissingEndpoint(key))?;

        if !endpoint.path.starts_with('/') {
            return Err(ConfigError::InvalidPath {
                endpoint: key,
                path: endpoint.path.clone(),
            });
        }

        Ok(endpoint.path.clone())
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        let endpoint = |method: &str, path: &str| Endpoint {
            method: method.to_string(),
            path: path.to_string(),
        };

        ServiceConfig {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
                shutdown_timeout_ms: 500,
            },
            logging: LoggingConfig::default(),
            files: FilesConfig::default(),
            scheduler: SchedulerConfig::default(),
            rest: RestConfig {
                endpoints: HashMap::from([
                    (GET_BURROWS.to_string(), endpoint("GET", "/burrows")),
                    (RENT_BURROW.to_string(), endpoint("POST", "/rent")),
                    (GET_REPORT.to_string(), endpoint("GET", "/report")),
                ]),
            },
        }
    }
}

//! Configuration schema definitions.
//!
//! `Settings` is the single resolved configuration value for one process
//! run. Every field has a default so an empty environment is a valid
//! configuration.

use std::fmt;
use std::str::FromStr;

/// Resolved application settings.
///
/// Built once by [`SettingsResolver`](crate::config::SettingsResolver) and
/// shared as `Arc<Settings>`; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Application name, used in identity responses and logs.
    pub app_name: String,

    /// Debug mode (verbose logging).
    pub debug: bool,

    /// Database connection URI; the scheme selects the driver.
    pub database_url: String,

    /// Exact-match CORS allow list. `*` allows any origin.
    pub cors_origins: Vec<String>,

    /// Interface the HTTP listener binds to.
    pub server_host: String,

    /// Port the HTTP listener binds to.
    pub server_port: u16,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Upper bound of the connection pool.
    pub db_max_connections: u32,

    /// Connections kept open while idle.
    pub db_min_connections: u32,

    /// Time allowed to establish a database connection, in seconds.
    pub db_connect_timeout_secs: u64,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Settings {
    /// Field names as matched (case-insensitively) against source keys.
    pub const FIELDS: &'static [&'static str] = &[
        "app_name",
        "debug",
        "database_url",
        "cors_origins",
        "server_host",
        "server_port",
        "request_timeout_secs",
        "db_max_connections",
        "db_min_connections",
        "db_connect_timeout_secs",
        "log_format",
    ];

    /// `host:port` the HTTP listener binds to.
    pub fn bind_address(&self) -> String {
        if self.server_host.parse::<std::net::Ipv6Addr>().is_ok() {
            format!("[{}]:{}", self.server_host, self.server_port)
        } else {
            format!("{}:{}", self.server_host, self.server_port)
        }
    }

    /// Payload of the welcome endpoint.
    pub fn welcome_message(&self) -> String {
        format!("Welcome to {}", self.app_name)
    }

    /// Payload of the API root endpoint.
    pub fn api_identity(&self) -> String {
        format!("{} v1", self.app_name)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "AceFlow GEO API".to_string(),
            debug: true,
            database_url: "sqlite://./data/app.db".to_string(),
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
            server_host: "127.0.0.1".to_string(),
            server_port: 8000,
            request_timeout_secs: 30,
            db_max_connections: 10,
            db_min_connections: 1,
            db_connect_timeout_secs: 30,
            log_format: LogFormat::Pretty,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable, for terminals.
    #[default]
    Pretty,
    /// One JSON object per line, for log shippers.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{}', expected 'pretty' or 'json'", other)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

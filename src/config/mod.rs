//! Configuration module for the RSVP backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Which record store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Sqlite => "sqlite",
            StoreBackend::Memory => "memory",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Some(StoreBackend::Sqlite),
            "memory" => Some(StoreBackend::Memory),
            _ => None,
        }
    }
}

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Startup configuration failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid RSVP_BIND_ADDR {value:?}: {source}")]
    BindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("invalid RSVP_STORE {0:?} (expected sqlite or memory)")]
    Store(String),
    #[error("invalid RSVP_DB_MAX_CONNECTIONS {0:?} (expected a positive integer)")]
    MaxConnections(String),
    #[error("invalid RSVP_LOG_FORMAT {0:?} (expected pretty or json)")]
    LogFormat(String),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Maximum number of pooled SQLite connections
    pub db_max_connections: u32,
    /// Record store implementation
    pub store: StoreBackend,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log output format (pretty or json)
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("RSVP_DB_PATH")
            .unwrap_or_else(|_| "./data/rsvp.sqlite".to_string())
            .into();

        let db_max_connections = match env::var("RSVP_DB_MAX_CONNECTIONS") {
            Ok(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::MaxConnections(raw)),
            },
            Err(_) => 5,
        };

        let store = match env::var("RSVP_STORE") {
            Ok(raw) => StoreBackend::parse(&raw).ok_or(ConfigError::Store(raw))?,
            Err(_) => StoreBackend::Sqlite,
        };

        let bind_raw = env::var("RSVP_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
        let bind_addr = bind_raw
            .parse()
            .map_err(|source| ConfigError::BindAddr {
                value: bind_raw.clone(),
                source,
            })?;

        let log_level = env::var("RSVP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_format = match env::var("RSVP_LOG_FORMAT") {
            Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "pretty" => LogFormat::Pretty,
                "json" => LogFormat::Json,
                _ => return Err(ConfigError::LogFormat(raw)),
            },
            Err(_) => LogFormat::Pretty,
        };

        Ok(Self {
            db_path,
            db_max_connections,
            store,
            bind_addr,
            log_level,
            log_format,
        })
    }
}

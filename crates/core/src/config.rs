//! Configuration loader for TubeWatch services
//!
//! All configuration is read from environment variables with the `TUBEWATCH_`
//! prefix, with defaults for optional fields and validation with clear error
//! messages. `.env` files are supported via dotenvy (call
//! [`load_dotenv`] before [`AppConfig::from_env`]).
//!
//! # Environment Variables
//!
//! - `TUBEWATCH_DATABASE_URL` (or `DATABASE_URL`, required): PostgreSQL URL
//! - `TUBEWATCH_DATABASE_MAX_CONNECTIONS` (optional, default: 20)
//! - `TUBEWATCH_DATABASE_MIN_CONNECTIONS` (optional, default: 2)
//! - `TUBEWATCH_DATABASE_CONNECT_TIMEOUT` (optional, seconds, default: 30)
//! - `TUBEWATCH_DATABASE_IDLE_TIMEOUT` (optional, seconds, default: 600)
//! - `TUBEWATCH_HOST` (optional, default: "0.0.0.0")
//! - `TUBEWATCH_PORT` (optional, default: 8080)
//! - `TUBEWATCH_API_KEYS` (or `YT_API_KEY`, required): comma-separated
//!   YouTube Data API v3 keys
//! - `TUBEWATCH_SEARCH_QUERY` (optional, default: "cricket")
//! - `TUBEWATCH_POLL_INTERVAL` (optional, seconds, default: 10)
//! - `TUBEWATCH_KEY_COOLDOWN` (optional, seconds, default: 3600)

use crate::error::CoreError;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Load a `.env` file if present. Missing files are not an error.
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Parse an environment variable with a default for missing values
fn parse_env_var<T: FromStr>(key: &str, default: T) -> Result<T, CoreError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|_| CoreError::config(format!("Invalid value for {key}: {raw:?}"), key)),
        Err(_) => Ok(default),
    }
}

/// Split a comma-separated key list, trimming whitespace and dropping empties
fn parse_key_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Top-level application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub ingest: IngestConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, CoreError> {
        Ok(Self {
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            ingest: IngestConfig::from_env()?,
        })
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> Result<(), CoreError> {
        self.database.validate()?;
        self.ingest.validate()?;
        Ok(())
    }
}

/// PostgreSQL connection configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections in the pool
    pub min_connections: u32,
    /// Connection timeout duration
    pub connect_timeout: Duration,
    /// Idle connection timeout duration
    pub idle_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/tubewatch".to_string(),
            max_connections: 20,
            min_connections: 2,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
        }
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, CoreError> {
        let url = std::env::var("TUBEWATCH_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .map_err(|_| {
                CoreError::config(
                    "DATABASE_URL or TUBEWATCH_DATABASE_URL must be set",
                    "TUBEWATCH_DATABASE_URL",
                )
            })?;

        let defaults = DatabaseConfig::default();
        let max_connections =
            parse_env_var("TUBEWATCH_DATABASE_MAX_CONNECTIONS", defaults.max_connections)?;
        let min_connections =
            parse_env_var("TUBEWATCH_DATABASE_MIN_CONNECTIONS", defaults.min_connections)?;
        let connect_timeout_secs = parse_env_var("TUBEWATCH_DATABASE_CONNECT_TIMEOUT", 30u64)?;
        let idle_timeout_secs = parse_env_var("TUBEWATCH_DATABASE_IDLE_TIMEOUT", 600u64)?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            idle_timeout: Duration::from_secs(idle_timeout_secs),
        })
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        Url::parse(&self.url).map_err(|e| {
            CoreError::config(format!("Invalid DATABASE_URL: {e}"), "TUBEWATCH_DATABASE_URL")
        })?;

        if self.max_connections == 0 {
            return Err(CoreError::config(
                "max_connections must be greater than 0",
                "TUBEWATCH_DATABASE_MAX_CONNECTIONS",
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(CoreError::config(
                format!(
                    "min_connections ({}) cannot exceed max_connections ({})",
                    self.min_connections, self.max_connections
                ),
                "TUBEWATCH_DATABASE_MIN_CONNECTIONS",
            ));
        }

        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host
    pub host: String,
    /// Server port (default: 8080)
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, CoreError> {
        let host =
            std::env::var("TUBEWATCH_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_env_var("TUBEWATCH_PORT", 8080u16)?;
        Ok(Self { host, port })
    }
}

/// Ingestion loop configuration
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Search query submitted to the upstream API every cycle
    pub query: String,
    /// Delay between poll iterations
    pub poll_interval: Duration,
    /// Credential keys, in priority order
    pub api_keys: Vec<String>,
    /// How long a rate-limited key stays deactivated
    pub key_cooldown: Duration,
}

impl IngestConfig {
    pub fn from_env() -> Result<Self, CoreError> {
        let raw_keys = std::env::var("TUBEWATCH_API_KEYS")
            .or_else(|_| std::env::var("YT_API_KEY"))
            .map_err(|_| {
                CoreError::config(
                    "TUBEWATCH_API_KEYS (or YT_API_KEY) must be set",
                    "TUBEWATCH_API_KEYS",
                )
            })?;

        let query =
            std::env::var("TUBEWATCH_SEARCH_QUERY").unwrap_or_else(|_| "cricket".to_string());
        let poll_interval_secs = parse_env_var("TUBEWATCH_POLL_INTERVAL", 10u64)?;
        let key_cooldown_secs = parse_env_var("TUBEWATCH_KEY_COOLDOWN", 3600u64)?;

        Ok(Self {
            query,
            poll_interval: Duration::from_secs(poll_interval_secs),
            api_keys: parse_key_list(&raw_keys),
            key_cooldown: Duration::from_secs(key_cooldown_secs),
        })
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.api_keys.is_empty() {
            return Err(CoreError::config(
                "At least one API key is required",
                "TUBEWATCH_API_KEYS",
            ));
        }

        if self.query.trim().is_empty() {
            return Err(CoreError::config(
                "Search query must not be empty",
                "TUBEWATCH_SEARCH_QUERY",
            ));
        }

        if self.poll_interval.as_secs() == 0 {
            return Err(CoreError::config(
                "poll_interval must be greater than 0 seconds",
                "TUBEWATCH_POLL_INTERVAL",
            ));
        }

        if self.key_cooldown.as_secs() == 0 {
            return Err(CoreError::config(
                "key_cooldown must be greater than 0 seconds",
                "TUBEWATCH_KEY_COOLDOWN",
            ));
        }

        Ok(())
    }
}

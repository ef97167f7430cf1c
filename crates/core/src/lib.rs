//! # TubeWatch Core
//!
//! Shared building blocks for the TubeWatch services: configuration loading,
//! error types, the PostgreSQL connection pool, pagination math for the read
//! API, and graceful shutdown coordination.
//!
//! ## Modules
//!
//! - `config`: Environment-based configuration with validation
//! - `database`: Shared PostgreSQL connection pool
//! - `error`: Error types and handling
//! - `pagination`: Offset pagination math for API endpoints
//! - `shutdown`: Graceful shutdown signal handling

pub mod config;
pub mod database;
pub mod error;
pub mod pagination;
pub mod shutdown;

pub use config::{AppConfig, DatabaseConfig, IngestConfig, ServerConfig};
pub use database::{DatabasePool, PoolStats};
pub use error::CoreError;
pub use pagination::{PageMeta, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use shutdown::{Shutdown, ShutdownSignal};

/// Result type alias for TubeWatch core operations
pub type Result<T> = std::result::Result<T, CoreError>;

//! Error types shared across TubeWatch services

use thiserror::Error;

/// Error type for core operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        key: Option<String>,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CoreError {
    /// Build a configuration error tied to an environment variable
    pub fn config(message: impl Into<String>, key: &str) -> Self {
        Self::Configuration {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }
}

//! TubeWatch Ingestion Pipeline
//!
//! This crate polls the YouTube Data API v3 search endpoint on a fixed
//! interval, rotating across a pool of credential keys when quota limits are
//! hit, validates and normalizes the raw items into canonical video records,
//! and persists only previously unseen records (deduplicated by the upstream
//! video id).

pub mod fetcher;
pub mod key_pool;
pub mod normalizer;
pub mod pipeline;
pub mod repository;

// Re-export main types
pub use fetcher::{SearchClient, VideoSource, YOUTUBE_API_BASE};
pub use key_pool::{KeyPool, KeyStatus};
pub use normalizer::{normalize, RawVideo, Rejection, VideoRecord};
pub use pipeline::{IngestionPipeline, PollConfig};
pub use repository::{PostgresVideoRepository, StoredVideo, VideoRepository};

/// Common error type for the ingestion pipeline
#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limited by upstream API (status {status})")]
    RateLimited { status: u16 },

    #[error("No active API keys available")]
    NoActiveKeys,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, IngestionError>;

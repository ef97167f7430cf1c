//! YouTube Data API v3 search client with key rotation
//!
//! Quota exhaustion (403) and rate limiting (429) deactivate the current key
//! and trigger exactly one retry with a newly selected key; a second
//! rate-limit or an empty pool means the cycle is skipped. Any other
//! transport or protocol failure also skips the cycle, without touching key
//! state.

use crate::key_pool::KeyPool;
use crate::normalizer::RawVideo;
use crate::{IngestionError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Production endpoint base
pub const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of raw video batches, fetched one query at a time
///
/// `Ok(None)` means "no batch this cycle" (rate limits, key exhaustion, or a
/// transient upstream failure); the poll loop skips the iteration and keeps
/// running.
#[async_trait]
pub trait VideoSource: Send + Sync {
    async fn fetch(&self, query: &str) -> Result<Option<Vec<RawVideo>>>;
}

/// Search client for the YouTube Data API v3
pub struct SearchClient {
    client: Client,
    base_url: String,
    key_pool: Arc<KeyPool>,
}

impl SearchClient {
    /// Create a client against the production endpoint
    pub fn new(key_pool: Arc<KeyPool>) -> Self {
        Self::with_base_url(key_pool, YOUTUBE_API_BASE.to_string())
    }

    /// Create a client against a custom endpoint (used by tests)
    pub fn with_base_url(key_pool: Arc<KeyPool>, base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            key_pool,
        }
    }

    fn is_rate_limit(status: StatusCode) -> bool {
        // YouTube reports quota exhaustion as 403 and rate limiting as 429.
        status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS
    }

    /// One network attempt with a specific key
    async fn attempt(&self, query: &str, key: &str) -> Result<Vec<RawVideo>> {
        let url = format!(
            "{}/search?part=snippet&q={}&order=date&key={}",
            self.base_url,
            urlencoding::encode(query),
            key
        );

        let response = self
            .client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        let status = response.status();

        if Self::is_rate_limit(status) {
            return Err(IngestionError::RateLimited {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            return Err(IngestionError::Http(
                response.error_for_status().unwrap_err(),
            ));
        }

        let data: Value = response.json().await?;
        let items = data
            .get("items")
            .and_then(Value::as_array)
            .map(|items| items.iter().cloned().map(RawVideo::new).collect())
            .unwrap_or_default();

        Ok(items)
    }
}

#[async_trait]
impl VideoSource for SearchClient {
    async fn fetch(&self, query: &str) -> Result<Option<Vec<RawVideo>>> {
        let key = match self.key_pool.select_active_key() {
            Ok(key) => key,
            Err(_) => {
                warn!("No active API keys, skipping fetch this cycle");
                return Ok(None);
            }
        };

        match self.attempt(query, &key).await {
            Ok(items) => return Ok(Some(items)),
            Err(IngestionError::RateLimited { status }) => {
                warn!(status, "API key rate limited, rotating to next key");
                self.key_pool
                    .deactivate(&key, &format!("upstream status {status}"));
            }
            Err(err) => {
                warn!(error = %err, "Search request failed, skipping this cycle");
                return Ok(None);
            }
        }

        // Exactly one retry with a freshly selected key.
        let retry_key = match self.key_pool.select_active_key() {
            Ok(key) => key,
            Err(_) => {
                warn!("No active API keys left for retry, skipping fetch this cycle");
                return Ok(None);
            }
        };

        match self.attempt(query, &retry_key).await {
            Ok(items) => Ok(Some(items)),
            Err(IngestionError::RateLimited { status }) => {
                warn!(status, "Retry key also rate limited, giving up this cycle");
                self.key_pool
                    .deactivate(&retry_key, &format!("upstream status {status}"));
                Ok(None)
            }
            Err(err) => {
                warn!(error = %err, "Retry request failed, skipping this cycle");
                Ok(None)
            }
        }
    }
}

impl std::fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_status_pair() {
        assert!(SearchClient::is_rate_limit(StatusCode::FORBIDDEN));
        assert!(SearchClient::is_rate_limit(StatusCode::TOO_MANY_REQUESTS));
        assert!(!SearchClient::is_rate_limit(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!SearchClient::is_rate_limit(StatusCode::BAD_REQUEST));
        assert!(!SearchClient::is_rate_limit(StatusCode::OK));
    }
}

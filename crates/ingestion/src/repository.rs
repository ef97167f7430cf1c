//! Video repository for database persistence
//!
//! The store is append-only with dedup on insert: a record is never updated
//! or deleted once written, and the UNIQUE constraint on `external_id` is the
//! authoritative guard against duplicates. The pre-insert existence check is
//! a fast path only.

use crate::normalizer::VideoRecord;
use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use std::collections::HashSet;
use tubewatch_core::pagination::PageMeta;

/// Video repository trait for persistence operations
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Persist the candidates that are not already stored
    ///
    /// Returns exactly the records that were newly persisted, which is empty
    /// when every candidate was a duplicate or the batch was empty.
    async fn insert_new(&self, candidates: &[VideoRecord]) -> Result<Vec<VideoRecord>>;

    /// Fetch one page of stored videos, newest publish date first
    ///
    /// # Arguments
    /// * `page` - 1-based page number
    /// * `page_size` - Items per page
    ///
    /// # Returns
    /// The page rows and the total stored count.
    async fn list_page(&self, page: i64, page_size: i64) -> Result<(Vec<StoredVideo>, i64)>;
}

/// A persisted video row
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StoredVideo {
    pub id: i64,
    pub external_id: String,
    pub kind: String,
    pub published_at: DateTime<Utc>,
    pub channel_id: String,
    pub title: String,
    pub description: Option<String>,
    pub channel_title: Option<String>,
    pub thumbnail_url: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

/// PostgreSQL implementation of VideoRepository
pub struct PostgresVideoRepository {
    pool: PgPool,
}

impl PostgresVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRepository for PostgresVideoRepository {
    async fn insert_new(&self, candidates: &[VideoRecord]) -> Result<Vec<VideoRecord>> {
        if candidates.is_empty() {
            return Ok(vec![]);
        }

        let candidate_ids: Vec<String> = candidates
            .iter()
            .map(|c| c.external_id.clone())
            .collect();

        // Fast-path existence check; the unique constraint below still
        // guards against batches racing on overlapping keys.
        let existing: Vec<String> = sqlx::query_scalar(
            "SELECT external_id FROM videos WHERE external_id = ANY($1)",
        )
        .bind(&candidate_ids)
        .fetch_all(&self.pool)
        .await?;
        let existing: HashSet<String> = existing.into_iter().collect();

        // Drop known duplicates and intra-batch repeats, keeping first wins.
        let mut seen: HashSet<&str> = HashSet::new();
        let fresh: Vec<&VideoRecord> = candidates
            .iter()
            .filter(|c| !existing.contains(&c.external_id))
            .filter(|c| seen.insert(c.external_id.as_str()))
            .collect();

        if fresh.is_empty() {
            return Ok(vec![]);
        }

        let external_ids: Vec<String> = fresh.iter().map(|c| c.external_id.clone()).collect();
        let kinds: Vec<String> = fresh.iter().map(|c| c.kind.clone()).collect();
        let published_ats: Vec<DateTime<Utc>> = fresh.iter().map(|c| c.published_at).collect();
        let channel_ids: Vec<String> = fresh.iter().map(|c| c.channel_id.clone()).collect();
        let titles: Vec<String> = fresh.iter().map(|c| c.title.clone()).collect();
        let descriptions: Vec<Option<String>> =
            fresh.iter().map(|c| c.description.clone()).collect();
        let channel_titles: Vec<Option<String>> =
            fresh.iter().map(|c| c.channel_title.clone()).collect();
        let thumbnail_urls: Vec<Option<String>> =
            fresh.iter().map(|c| c.thumbnail_url.clone()).collect();
        let fetched_ats: Vec<DateTime<Utc>> = fresh.iter().map(|c| c.fetched_at).collect();

        // Single batch insert; a conflicting row lost a race to a concurrent
        // batch and is silently dropped from the returned set.
        let inserted_ids: Vec<String> = sqlx::query_scalar(
            r#"
            INSERT INTO videos (
                external_id, kind, published_at, channel_id,
                title, description, channel_title, thumbnail_url, fetched_at
            )
            SELECT * FROM UNNEST(
                $1::text[], $2::text[], $3::timestamptz[], $4::text[],
                $5::text[], $6::text[], $7::text[], $8::text[], $9::timestamptz[]
            )
            ON CONFLICT (external_id) DO NOTHING
            RETURNING external_id
            "#,
        )
        .bind(&external_ids)
        .bind(&kinds)
        .bind(&published_ats)
        .bind(&channel_ids)
        .bind(&titles)
        .bind(&descriptions)
        .bind(&channel_titles)
        .bind(&thumbnail_urls)
        .bind(&fetched_ats)
        .fetch_all(&self.pool)
        .await?;
        let inserted_ids: HashSet<String> = inserted_ids.into_iter().collect();

        Ok(fresh
            .into_iter()
            .filter(|c| inserted_ids.contains(&c.external_id))
            .cloned()
            .collect())
    }

    async fn list_page(&self, page: i64, page_size: i64) -> Result<(Vec<StoredVideo>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos")
            .fetch_one(&self.pool)
            .await?;

        let offset = PageMeta::offset(page, page_size);
        let rows = sqlx::query_as::<_, StoredVideo>(
            r#"
            SELECT id, external_id, kind, published_at, channel_id,
                   title, description, channel_title, thumbnail_url, fetched_at
            FROM videos
            ORDER BY published_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page_size)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }
}

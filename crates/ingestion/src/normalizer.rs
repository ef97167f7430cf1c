//! Validation and normalization of raw search items
//!
//! [`normalize`] is a strict schema gate: every required nested field must be
//! present (and the publish timestamp parseable) or the item is rejected with
//! a structured reason. Partial items never reach storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Sentinel used when the upstream `kind` field is absent
const DEFAULT_KIND: &str = "unknown";

/// Raw search item from the upstream API, pending validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawVideo {
    /// Raw JSON item from the search response
    pub data: Value,
    /// Fetch timestamp
    pub fetched_at: DateTime<Utc>,
}

impl RawVideo {
    pub fn new(data: Value) -> Self {
        Self {
            data,
            fetched_at: Utc::now(),
        }
    }
}

/// Canonical video record, validated and ready for persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    /// Upstream-assigned unique video id (natural key)
    pub external_id: String,
    /// Upstream resource kind, "unknown" when absent
    pub kind: String,
    /// Publish timestamp, UTC
    pub published_at: DateTime<Utc>,
    pub channel_id: String,
    pub title: String,
    pub description: Option<String>,
    pub channel_title: Option<String>,
    /// Default-resolution thumbnail only; other resolutions are ignored
    pub thumbnail_url: Option<String>,
    /// When the item was fetched, carried over from the raw item
    pub fetched_at: DateTime<Utc>,
}

/// Why an item was rejected by the schema gate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("missing required field {0}")]
    MissingField(&'static str),

    #[error("unparseable publish timestamp {0:?}")]
    InvalidTimestamp(String),
}

/// Walk a dotted path through nested JSON objects
fn string_at(value: &Value, path: &'static str) -> Option<String> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    current.as_str().map(str::to_string)
}

fn required(value: &Value, path: &'static str) -> Result<String, Rejection> {
    string_at(value, path).ok_or(Rejection::MissingField(path))
}

/// Validate and normalize one raw item into a canonical record
///
/// Pure function: no side effects, no network or storage access.
pub fn normalize(raw: &RawVideo) -> Result<VideoRecord, Rejection> {
    let item = &raw.data;

    let external_id = required(item, "id.videoId")?;
    let published_raw = required(item, "snippet.publishedAt")?;
    let channel_id = required(item, "snippet.channelId")?;
    let title = required(item, "snippet.title")?;
    let description = required(item, "snippet.description")?;
    let channel_title = required(item, "snippet.channelTitle")?;
    let thumbnail_url = required(item, "snippet.thumbnails.default.url")?;

    let published_at = DateTime::parse_from_rfc3339(&published_raw)
        .map_err(|_| Rejection::InvalidTimestamp(published_raw.clone()))?
        .with_timezone(&Utc);

    let kind = string_at(item, "kind").unwrap_or_else(|| DEFAULT_KIND.to_string());

    Ok(VideoRecord {
        external_id,
        kind,
        published_at,
        channel_id,
        title,
        description: Some(description),
        channel_title: Some(channel_title),
        thumbnail_url: Some(thumbnail_url),
        fetched_at: raw.fetched_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_item() -> Value {
        json!({
            "kind": "youtube#searchResult",
            "id": { "videoId": "abc123" },
            "snippet": {
                "publishedAt": "2024-05-01T12:30:00Z",
                "channelId": "UC-chan",
                "title": "Test match highlights",
                "description": "Day three wrap-up",
                "channelTitle": "Cricket Daily",
                "thumbnails": {
                    "default": { "url": "https://i.ytimg.com/vi/abc123/default.jpg" },
                    "high": { "url": "https://i.ytimg.com/vi/abc123/hqdefault.jpg" }
                }
            }
        })
    }

    #[test]
    fn test_normalizes_complete_item() {
        let raw = RawVideo::new(full_item());
        let record = normalize(&raw).unwrap();
        assert_eq!(record.external_id, "abc123");
        assert_eq!(record.kind, "youtube#searchResult");
        assert_eq!(record.channel_id, "UC-chan");
        assert_eq!(record.title, "Test match highlights");
        assert_eq!(record.description.as_deref(), Some("Day three wrap-up"));
        assert_eq!(record.channel_title.as_deref(), Some("Cricket Daily"));
        assert_eq!(
            record.thumbnail_url.as_deref(),
            Some("https://i.ytimg.com/vi/abc123/default.jpg")
        );
        assert_eq!(record.published_at.to_rfc3339(), "2024-05-01T12:30:00+00:00");
        assert_eq!(record.fetched_at, raw.fetched_at);
    }

    #[test]
    fn test_kind_defaults_to_unknown() {
        let mut item = full_item();
        item.as_object_mut().unwrap().remove("kind");
        let record = normalize(&RawVideo::new(item)).unwrap();
        assert_eq!(record.kind, "unknown");
    }

    #[test]
    fn test_every_required_path_is_enforced() {
        let cases: Vec<(&str, Box<dyn Fn(&mut Value)>)> = vec![
            ("id.videoId", Box::new(|v| {
                v["id"].as_object_mut().unwrap().remove("videoId");
            })),
            ("snippet.publishedAt", Box::new(|v| {
                v["snippet"].as_object_mut().unwrap().remove("publishedAt");
            })),
            ("snippet.channelId", Box::new(|v| {
                v["snippet"].as_object_mut().unwrap().remove("channelId");
            })),
            ("snippet.title", Box::new(|v| {
                v["snippet"].as_object_mut().unwrap().remove("title");
            })),
            ("snippet.description", Box::new(|v| {
                v["snippet"].as_object_mut().unwrap().remove("description");
            })),
            ("snippet.channelTitle", Box::new(|v| {
                v["snippet"].as_object_mut().unwrap().remove("channelTitle");
            })),
            ("snippet.thumbnails.default.url", Box::new(|v| {
                v["snippet"]["thumbnails"].as_object_mut().unwrap().remove("default");
            })),
        ];

        for (path, strip) in cases {
            let mut item = full_item();
            strip(&mut item);
            let result = normalize(&RawVideo::new(item));
            assert_eq!(result, Err(Rejection::MissingField(path)), "path {path}");
        }
    }

    #[test]
    fn test_mistyped_field_is_rejected() {
        let mut item = full_item();
        item["snippet"]["title"] = json!(42);
        assert_eq!(
            normalize(&RawVideo::new(item)),
            Err(Rejection::MissingField("snippet.title"))
        );
    }

    #[test]
    fn test_bad_timestamp_is_rejected() {
        let mut item = full_item();
        item["snippet"]["publishedAt"] = json!("yesterday");
        assert_eq!(
            normalize(&RawVideo::new(item)),
            Err(Rejection::InvalidTimestamp("yesterday".to_string()))
        );
    }

    #[test]
    fn test_offset_timestamp_preserves_instant() {
        let mut item = full_item();
        item["snippet"]["publishedAt"] = json!("2024-05-01T14:30:00+02:00");
        let record = normalize(&RawVideo::new(item)).unwrap();
        assert_eq!(record.published_at.to_rfc3339(), "2024-05-01T12:30:00+00:00");
    }
}

//! Route tests for the paginated video listing

use actix_web::{test, web, App};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tubewatch_api::{routes, AppState};
use tubewatch_ingestion::{Result, StoredVideo, VideoRecord, VideoRepository};

/// Repository stub serving a fixed set of rows
struct FixedRepository {
    rows: Vec<StoredVideo>,
}

impl FixedRepository {
    fn with_rows(count: i64) -> Self {
        let now = Utc::now();
        let rows = (0..count)
            .map(|i| StoredVideo {
                id: i + 1,
                external_id: format!("vid-{i}"),
                kind: "youtube#searchResult".to_string(),
                published_at: now - Duration::minutes(i),
                channel_id: "UC-test".to_string(),
                title: format!("Video {i}"),
                description: Some("A test video".to_string()),
                channel_title: Some("Test Channel".to_string()),
                thumbnail_url: Some("https://example.com/t.jpg".to_string()),
                fetched_at: now,
            })
            .collect();
        Self { rows }
    }
}

#[async_trait]
impl VideoRepository for FixedRepository {
    async fn insert_new(&self, _candidates: &[VideoRecord]) -> Result<Vec<VideoRecord>> {
        Ok(vec![])
    }

    async fn list_page(&self, page: i64, page_size: i64) -> Result<(Vec<StoredVideo>, i64)> {
        let offset = (page - 1).saturating_mul(page_size) as usize;
        let rows = self
            .rows
            .iter()
            .skip(offset)
            .take(page_size as usize)
            .cloned()
            .collect();
        Ok((rows, self.rows.len() as i64))
    }
}

fn app_state(total: i64) -> web::Data<AppState> {
    web::Data::new(AppState {
        repository: Arc::new(FixedRepository::with_rows(total)),
    })
}

#[actix_web::test]
async fn test_videos_default_page() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(25))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/videos").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"].as_array().unwrap().len(), 20);
    assert_eq!(body["pagination"]["current_page"], 1);
    assert_eq!(body["pagination"]["page_size"], 20);
    assert_eq!(body["pagination"]["total_count"], 25);
    assert_eq!(body["pagination"]["total_pages"], 2);
    assert_eq!(body["pagination"]["has_next"], true);
    assert_eq!(body["pagination"]["has_previous"], false);
}

#[actix_web::test]
async fn test_videos_last_page_math() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(25))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/videos?page=3&page_size=10")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"].as_array().unwrap().len(), 5);
    assert_eq!(body["pagination"]["total_pages"], 3);
    assert_eq!(body["pagination"]["has_next"], false);
    assert_eq!(body["pagination"]["has_previous"], true);
    assert_eq!(body["pagination"]["previous_page"], 2);
    assert_eq!(body["pagination"]["next_page"], serde_json::Value::Null);
}

#[actix_web::test]
async fn test_videos_huge_page_is_an_empty_page() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(5))
            .configure(routes::configure),
    )
    .await;

    // Valid per the query checks but past any real page; the offset math
    // must saturate rather than overflow.
    let req = test::TestRequest::get()
        .uri("/videos?page=9223372036854775806&page_size=100")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"].as_array().unwrap().len(), 0);
    assert_eq!(body["pagination"]["total_count"], 5);
    assert_eq!(body["pagination"]["has_next"], false);
}

#[actix_web::test]
async fn test_videos_rejects_bad_page() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(5))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/videos?page=0").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_videos_rejects_oversized_page_size() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(5))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/videos?page_size=101")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::get()
        .uri("/videos?page_size=0")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_health_endpoint() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(0))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "tubewatch-api");
}

//! Paginated video listing

use super::AppState;
use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tubewatch_core::pagination::{PageMeta, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use tubewatch_ingestion::StoredVideo;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Serialize)]
struct VideoPage {
    data: Vec<StoredVideo>,
    pagination: PageMeta,
}

/// `GET /videos?page=&page_size=` — stored videos, newest publish date first
pub async fn list_videos(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> impl Responder {
    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

    if page < 1 {
        return HttpResponse::BadRequest().json(json!({
            "error": "Invalid page",
            "message": "page must be >= 1"
        }));
    }

    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return HttpResponse::BadRequest().json(json!({
            "error": "Invalid page_size",
            "message": format!("page_size must be between 1 and {MAX_PAGE_SIZE}")
        }));
    }

    match state.repository.list_page(page, page_size).await {
        Ok((data, total_count)) => HttpResponse::Ok().json(VideoPage {
            data,
            pagination: PageMeta::new(total_count, page, page_size),
        }),
        Err(e) => {
            tracing::error!("Failed to list videos: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "error": "Failed to list videos"
            }))
        }
    }
}

//! HTTP route wiring

pub mod health;
pub mod videos;

use actix_web::web;
use std::sync::Arc;
use tubewatch_ingestion::VideoRepository;

/// Shared application state for request handlers
pub struct AppState {
    pub repository: Arc<dyn VideoRepository>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/videos", web::get().to(videos::list_videos))
        .route("/health", web::get().to(health::health_check));
}

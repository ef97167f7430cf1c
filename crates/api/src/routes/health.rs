use actix_web::HttpResponse;

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "tubewatch-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

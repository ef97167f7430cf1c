//! TubeWatch API service
//!
//! Serves the paginated video read API and hosts the ingestion poll loop as a
//! background task, so API reads never block on upstream fetches.

use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use tracing::info;
use tubewatch_api::{routes, AppState};
use tubewatch_core::{config, AppConfig, DatabasePool, Shutdown};
use tubewatch_ingestion::{
    IngestionPipeline, KeyPool, PollConfig, PostgresVideoRepository, SearchClient,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    config::load_dotenv();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .json()
        .init();

    let config = AppConfig::from_env()?;
    config.validate()?;

    let db = DatabasePool::connect(&config.database).await?;
    sqlx::migrate!("../../migrations").run(db.pool()).await?;

    let repository = Arc::new(PostgresVideoRepository::new(db.pool().clone()));

    let key_pool = Arc::new(KeyPool::new(
        config.ingest.api_keys.clone(),
        config.ingest.key_cooldown,
    ));
    let source = Arc::new(SearchClient::new(key_pool));
    let pipeline = Arc::new(IngestionPipeline::new(
        source,
        repository.clone(),
        PollConfig {
            query: config.ingest.query.clone(),
            interval: config.ingest.poll_interval,
        },
    ));

    let shutdown = Shutdown::new();

    let ingest_handle = {
        let pipeline = pipeline.clone();
        let signal = shutdown.subscribe();
        tokio::spawn(async move { pipeline.run(signal).await })
    };

    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move { shutdown.listen_for_signals().await });
    }

    let state = web::Data::new(AppState {
        repository: repository.clone(),
    });

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    info!("TubeWatch API listening on {}", bind_addr);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .disable_signals()
    .bind(&bind_addr)?
    .run();

    let server_handle = server.handle();
    {
        let mut signal = shutdown.subscribe();
        tokio::spawn(async move {
            signal.recv().await;
            server_handle.stop(true).await;
        });
    }

    server.await?;

    // The HTTP server is down; make sure the poll loop stops too (covers
    // server-side exits that did not come from an OS signal).
    shutdown.trigger();
    ingest_handle.await?;

    info!("TubeWatch API stopped");
    Ok(())
}

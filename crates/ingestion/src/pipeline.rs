//! Poll loop driver tying fetch, normalize, and insert together
//!
//! One logical worker: each iteration runs fetch → normalize → insert
//! sequentially, and any failure inside an iteration is logged and contained
//! so the loop itself never dies. Shutdown is only observed while waiting for
//! the next tick, so an in-flight iteration always completes before exit.

use crate::fetcher::VideoSource;
use crate::normalizer::normalize;
use crate::repository::VideoRepository;
use crate::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};
use tubewatch_core::shutdown::ShutdownSignal;

/// Poll loop configuration, read once at startup
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Search query submitted every cycle
    pub query: String,
    /// Delay between iterations
    pub interval: Duration,
}

/// Ingestion poll loop
pub struct IngestionPipeline {
    source: Arc<dyn VideoSource>,
    repository: Arc<dyn VideoRepository>,
    config: PollConfig,
}

impl IngestionPipeline {
    pub fn new(
        source: Arc<dyn VideoSource>,
        repository: Arc<dyn VideoRepository>,
        config: PollConfig,
    ) -> Self {
        Self {
            source,
            repository,
            config,
        }
    }

    /// Run the poll loop until shutdown is requested
    pub async fn run(&self, mut shutdown: ShutdownSignal) {
        info!(
            query = %self.config.query,
            interval_secs = self.config.interval.as_secs(),
            "Starting ingestion loop"
        );

        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown.recv() => {
                    info!("Ingestion loop stopping");
                    break;
                }
            }

            if let Err(err) = self.run_once().await {
                error!(error = %err, "Ingestion cycle failed");
            }
        }
    }

    /// Run a single fetch → normalize → insert cycle
    ///
    /// Returns the number of newly persisted records.
    pub async fn run_once(&self) -> Result<usize> {
        let batch = match self.source.fetch(&self.config.query).await? {
            Some(batch) => batch,
            None => {
                debug!("No batch this cycle");
                return Ok(0);
            }
        };

        let fetched = batch.len();
        let mut candidates = Vec::with_capacity(fetched);
        for raw in &batch {
            match normalize(raw) {
                Ok(record) => candidates.push(record),
                Err(rejection) => debug!(reason = %rejection, "Skipping malformed item"),
            }
        }

        let inserted = self.repository.insert_new(&candidates).await?;
        info!(
            fetched,
            valid = candidates.len(),
            inserted = inserted.len(),
            "Ingestion cycle completed"
        );

        Ok(inserted.len())
    }
}

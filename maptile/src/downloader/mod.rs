//! Concurrent tile downloader.
//!
//! A bounded pool of workers pulls tiles from a shared job queue, resolves
//! each through the cache first and the provider's HTTP endpoint second,
//! and reports back over a results channel. Pool size is the provider's
//! `max_concurrency`, clamped to at least one.
//!
//! The batch fails fast: the first failed tile observed while draining
//! results ends the batch and the error carries whatever tiles had already
//! completed. Workers are not cancelled; each finishes its current tile,
//! fails to report it to the dropped results channel, and exits.
//!
//! Each fetch runs in its own task so a panicking provider or client is
//! reported as [`ProviderError::WorkerLost`] for that tile instead of
//! silently shrinking the batch.

mod error;
mod worker;

pub use error::DownloadError;

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use crate::cache::TileStore;
use crate::provider::{HttpClient, ProviderError, TileProvider};
use crate::tile::Tile;
use worker::FetchContext;

type Outcome = Result<Tile, (Tile, ProviderError)>;

/// Fetches batches of tiles for a provider.
#[derive(Clone)]
pub struct Downloader {
    client: Arc<dyn HttpClient>,
}

impl Downloader {
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self { client }
    }

    /// Resolve every tile in `tiles`, returning them with images attached.
    ///
    /// The result is in completion order, not input order. With a cache,
    /// hits skip the network and freshly downloaded tiles are saved in the
    /// background.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] for the first failure observed; a single
    /// failure fails the whole batch.
    pub async fn download(
        &self,
        cache: Option<Arc<dyn TileStore>>,
        provider: Arc<dyn TileProvider>,
        tiles: Vec<Tile>,
    ) -> Result<Vec<Tile>, DownloadError> {
        let total = tiles.len();
        if total == 0 {
            return Ok(Vec::new());
        }

        let workers = provider.max_concurrency().max(1);
        debug!(
            provider = provider.id(),
            tiles = total,
            workers,
            cached = cache.is_some(),
            "Starting download"
        );

        let context = FetchContext {
            client: Arc::clone(&self.client),
            provider: Arc::clone(&provider),
            cache,
        };

        let (job_tx, job_rx) = mpsc::channel::<Tile>(workers);
        let (result_tx, mut result_rx) = mpsc::channel::<Outcome>(total);
        let job_rx = Arc::new(Mutex::new(job_rx));

        for _ in 0..workers {
            let context = context.clone();
            let job_rx = Arc::clone(&job_rx);
            let result_tx = result_tx.clone();
            tokio::spawn(async move {
                loop {
                    let next = job_rx.lock().await.recv().await;
                    let Some(tile) = next else { break };
                    let outcome = context.fetch_isolated(tile.clone()).await.map_err(|e| {
                        warn!(tile = %tile, error = %e, "Tile fetch failed");
                        (tile, e)
                    });
                    if result_tx.send(outcome).await.is_err() {
                        break;
                    }
                }
            });
        }
        drop(result_tx);

        let pending = tiles.clone();
        tokio::spawn(async move {
            for tile in tiles {
                if job_tx.send(tile).await.is_err() {
                    break;
                }
            }
        });

        let mut completed = Vec::with_capacity(total);
        while completed.len() < total {
            match result_rx.recv().await {
                Some(Ok(tile)) => completed.push(tile),
                Some(Err((tile, source))) => {
                    return Err(DownloadError {
                        tile,
                        source,
                        completed,
                    });
                }
                None => {
                    let tile = first_missing(&pending, &completed);
                    return Err(DownloadError {
                        tile,
                        source: ProviderError::WorkerLost(
                            "result channel closed before every tile was reported".to_string(),
                        ),
                        completed,
                    });
                }
            }
        }

        info!(provider = provider.id(), tiles = completed.len(), "Download complete");
        Ok(completed)
    }
}

/// First input tile with no matching cell among the completed ones.
fn first_missing(pending: &[Tile], completed: &[Tile]) -> Tile {
    pending
        .iter()
        .find(|tile| !completed.iter().any(|done| done.same_cell(tile)))
        .or_else(|| pending.first())
        .cloned()
        .unwrap_or_else(|| Tile::new(0, 0, 0))
}

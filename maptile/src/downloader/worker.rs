//! Per-tile fetch logic run by each pool worker.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::TileStore;
use crate::provider::{HttpClient, ProviderError, TileProvider};
use crate::tile::Tile;

/// Everything a worker needs to resolve one tile.
#[derive(Clone)]
pub(crate) struct FetchContext {
    pub client: Arc<dyn HttpClient>,
    pub provider: Arc<dyn TileProvider>,
    pub cache: Option<Arc<dyn TileStore>>,
}

impl FetchContext {
    /// Run [`fetch`](Self::fetch) in its own task.
    ///
    /// A panic inside the provider or HTTP client becomes
    /// [`ProviderError::WorkerLost`] so the tile is still accounted for.
    pub async fn fetch_isolated(&self, tile: Tile) -> Result<Tile, ProviderError> {
        let context = self.clone();
        match tokio::spawn(async move { context.fetch(tile).await }).await {
            Ok(outcome) => outcome,
            Err(e) => Err(ProviderError::WorkerLost(e.to_string())),
        }
    }

    /// Resolve a tile from cache or network.
    ///
    /// A network result is handed to a detached save task; the caller never
    /// waits on it and save failures are only logged.
    pub async fn fetch(&self, tile: Tile) -> Result<Tile, ProviderError> {
        let vendor = self.provider.id();

        if let Some(cache) = &self.cache {
            if let Some(image) = cache.load(vendor, &tile).await {
                debug!(vendor, tile = %tile, "Cache hit");
                return Ok(tile.with_image(image));
            }
        }

        let request = self.provider.fetch_request(&tile);
        if !request.is_valid() {
            return Err(ProviderError::InvalidRequest(format!(
                "provider {} produced an empty URL for tile {}",
                vendor, tile
            )));
        }

        let response = self.client.send(&request).await?;
        if !response.is_ok() {
            return Err(ProviderError::Status {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        debug!(vendor, tile = %tile, bytes = response.body.len(), "Downloaded tile");
        let tile = tile.with_image(response.body);

        if let Some(cache) = &self.cache {
            spawn_save(Arc::clone(cache), vendor.to_string(), tile.clone());
        }

        Ok(tile)
    }
}

fn spawn_save(cache: Arc<dyn TileStore>, vendor: String, tile: Tile) {
    tokio::spawn(async move {
        if let Err(e) = cache.save(&vendor, &tile).await {
            warn!(vendor = %vendor, tile = %tile, error = %e, "Failed to cache tile");
        }
    });
}

//! Composite map requests.
//!
//! [`MapService`] ties the registry, the optional cache, the downloader and
//! the merger together: it validates a request, projects the center,
//! expands it to a grid, downloads the grid, and composites it.

mod error;

pub use error::ServiceError;

use std::sync::Arc;

use tracing::info;

use crate::cache::TileStore;
use crate::config::{DEFAULT_MAX_SIDE, DEFAULT_SIDE};
use crate::downloader::Downloader;
use crate::merge::merge;
use crate::provider::{ProviderRegistry, TileProvider};
use crate::tile::Tile;

/// One composite map request.
#[derive(Debug, Clone, PartialEq)]
pub struct MapRequest {
    pub provider: String,
    pub lat: f64,
    pub lon: f64,
    pub zoom: u8,
    /// Grid side; the service default when `None`.
    pub side: Option<u32>,
}

/// A finished composite.
#[derive(Debug, Clone)]
pub struct MapImage {
    pub center: Tile,
    pub side: u32,
    /// Number of tiles downloaded for the grid.
    pub tiles: usize,
    /// JPEG bytes.
    pub jpeg: Vec<u8>,
}

/// Answers [`MapRequest`]s.
pub struct MapService {
    registry: ProviderRegistry,
    downloader: Downloader,
    cache: Option<Arc<dyn TileStore>>,
    max_side: u32,
    default_side: u32,
}

impl MapService {
    pub fn new(registry: ProviderRegistry, downloader: Downloader) -> Self {
        Self {
            registry,
            downloader,
            cache: None,
            max_side: DEFAULT_MAX_SIDE,
            default_side: DEFAULT_SIDE,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn TileStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_side_limits(mut self, max_side: u32, default_side: u32) -> Self {
        self.max_side = max_side;
        self.default_side = default_side;
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Resolve the provider and check zoom and side against its limits.
    pub fn validate(
        &self,
        request: &MapRequest,
    ) -> Result<(Arc<dyn TileProvider>, u32), ServiceError> {
        let provider = self.registry.get(&request.provider)?;

        if !provider.supports_zoom(request.zoom) {
            return Err(ServiceError::InvalidZoom {
                provider: provider.name().to_string(),
                zoom: request.zoom,
                min: provider.min_zoom(),
                max: provider.max_zoom(),
            });
        }

        let side = request.side.unwrap_or(self.default_side);
        if side < 1 || side > self.max_side {
            return Err(ServiceError::InvalidSide {
                side,
                max: self.max_side,
            });
        }

        Ok((provider, side))
    }

    /// Build the composite for a request.
    ///
    /// Either the whole image is returned or a single error; there is no
    /// partial result.
    pub async fn render(&self, request: &MapRequest) -> Result<MapImage, ServiceError> {
        let (provider, side) = self.validate(request)?;
        let center = provider.tile_for(request.lat, request.lon, request.zoom)?;

        let tiles = self
            .downloader
            .download(self.cache.clone(), Arc::clone(&provider), center.nearby(side))
            .await?;
        let count = tiles.len();

        let merge_center = center.clone();
        let jpeg = tokio::task::spawn_blocking(move || merge(side, &merge_center, &tiles))
            .await
            .map_err(|e| ServiceError::TaskJoin(e.to_string()))??;

        info!(
            provider = provider.id(),
            lat = request.lat,
            lon = request.lon,
            zoom = request.zoom,
            side,
            bytes = jpeg.len(),
            "Rendered map"
        );

        Ok(MapImage {
            center,
            side,
            tiles: count,
            jpeg,
        })
    }
}

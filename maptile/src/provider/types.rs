//! Provider types and traits

use thiserror::Error;

use crate::coord::{self, CoordError, Ellipsoid};
use crate::tile::Tile;

/// Errors that can occur while building or issuing a tile request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// Transport-level failure (connect, TLS, timeout, malformed header)
    #[error("HTTP error: {0}")]
    Http(String),

    /// The server answered with something other than 200
    #[error("Server returned invalid status code {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be read to completion
    #[error("Failed to read response body: {0}")]
    BodyRead(String),

    /// The fetch descriptor is empty or unusable
    #[error("Invalid fetch request: {0}")]
    InvalidRequest(String),

    /// A schema-defined provider named a projection that does not exist
    #[error("Projection {projection} not found for provider {provider}")]
    UnknownProjection { projection: String, provider: String },

    /// The task resolving a tile stopped without reporting a result
    #[error("Worker stopped before reporting tile: {0}")]
    WorkerLost(String),
}

/// Outbound request template for one tile.
///
/// Built fresh for every tile from the provider's URL scheme; it carries no
/// state of its own and is never cached.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchRequest {
    /// Fully substituted request URL.
    pub url: String,
    /// Static request headers as `(name, value)` pairs.
    pub headers: Vec<(String, String)>,
}

impl FetchRequest {
    /// Create a request with no headers.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Returns true when the request has a usable URL.
    pub fn is_valid(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

/// Capability exposed by every imagery vendor.
///
/// Providers do no I/O themselves: they describe where a tile lives
/// ([`TileProvider::fetch_request`]) and how wide the download pool for the
/// vendor may be. The trait is object-safe so hard-coded vendors and
/// schema-defined vendors can sit side by side in one registry.
pub trait TileProvider: Send + Sync {
    /// Stable identifier used for lookup and as the cache namespace.
    fn id(&self) -> &str;

    /// Human-readable vendor name.
    fn name(&self) -> &str;

    /// Number of concurrent downloads allowed for this vendor.
    fn max_concurrency(&self) -> usize;

    /// Highest zoom level the vendor serves.
    fn max_zoom(&self) -> u8;

    /// Lowest zoom level accepted for composite requests.
    fn min_zoom(&self) -> u8 {
        1
    }

    /// Projection ellipsoid the vendor's tile grid is built on.
    fn ellipsoid(&self) -> Ellipsoid;

    /// Build the outbound request for a tile.
    fn fetch_request(&self, tile: &Tile) -> FetchRequest;

    /// Checks if this provider accepts the given zoom level.
    fn supports_zoom(&self, zoom: u8) -> bool {
        zoom >= self.min_zoom() && zoom <= self.max_zoom()
    }

    /// Project a geographic position onto this vendor's tile grid.
    fn tile_for(&self, lat: f64, lon: f64, zoom: u8) -> Result<Tile, CoordError> {
        let (x, y) = coord::project(lat, lon, zoom, &self.ellipsoid())?;
        Ok(Tile::new(x, y, zoom))
    }
}

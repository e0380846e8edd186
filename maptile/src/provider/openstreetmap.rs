//! OpenStreetMap standard tile layer.
//!
//! `https://tile.openstreetmap.org/{z}/{x}/{y}.png`
//!
//! The tile usage policy requires an identifying User-Agent, so requests
//! carry a browser-like header set.

use crate::coord::Ellipsoid;
use crate::provider::{FetchRequest, TileProvider};
use crate::tile::Tile;

const OSM_BASE_URL: &str = "https://tile.openstreetmap.org";

const MAX_ZOOM: u8 = 19;

const MAX_CONCURRENCY: usize = 5;

const HEADERS: [(&str, &str); 4] = [
    (
        "User-Agent",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    ),
    (
        "Accept",
        "image/avif,image/webp,image/apng,image/svg+xml,image/*,*/*;q=0.8",
    ),
    ("Accept-Encoding", "gzip, deflate, br, zstd"),
    ("Accept-Language", "en-US,en;q=0.9"),
];

/// OpenStreetMap raster tile provider.
#[derive(Debug, Clone, Default)]
pub struct OpenStreetMapProvider;

impl OpenStreetMapProvider {
    /// Registry identifier.
    pub const ID: &'static str = "osm";

    /// Creates a new OpenStreetMap provider.
    pub fn new() -> Self {
        Self
    }
}

impl TileProvider for OpenStreetMapProvider {
    fn id(&self) -> &str {
        Self::ID
    }

    fn name(&self) -> &str {
        "OpenStreetMap"
    }

    fn max_concurrency(&self) -> usize {
        MAX_CONCURRENCY
    }

    fn max_zoom(&self) -> u8 {
        MAX_ZOOM
    }

    fn ellipsoid(&self) -> Ellipsoid {
        Ellipsoid::SPHERICAL
    }

    fn fetch_request(&self, tile: &Tile) -> FetchRequest {
        HEADERS.iter().fold(
            FetchRequest::new(format!("{}/{}/{}/{}.png", OSM_BASE_URL, tile.z, tile.x, tile.y)),
            |req, (name, value)| req.with_header(*name, *value),
        )
    }
}

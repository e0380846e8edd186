//! ArcGIS World Imagery provider.
//!
//! Provides access to Esri's World Imagery basemap, which offers high-resolution
//! satellite and aerial imagery with global coverage.
//!
//! # URL Pattern
//!
//! `https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}`
//!
//! - Row before column in the path
//! - No authentication required for the public tier
//!
//! # Terms of Use
//!
//! The World Imagery basemap is provided by Esri and is subject to their
//! terms of use. See: <https://www.esri.com/en-us/legal/terms/full-master-agreement>

use crate::coord::Ellipsoid;
use crate::provider::{FetchRequest, TileProvider};
use crate::tile::Tile;

/// Base URL for ArcGIS World Imagery tiles.
const ARCGIS_BASE_URL: &str =
    "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile";

/// ArcGIS provides imagery up to zoom level 19 in most areas.
const MAX_ZOOM: u8 = 19;

const MAX_CONCURRENCY: usize = 5;

/// ArcGIS World Imagery satellite provider.
#[derive(Debug, Clone, Default)]
pub struct ArcGisProvider;

impl ArcGisProvider {
    /// Registry identifier.
    pub const ID: &'static str = "arcgis";

    /// Creates a new ArcGIS World Imagery provider.
    pub fn new() -> Self {
        Self
    }

    /// Builds the tile URL for the given coordinates.
    fn build_url(&self, tile: &Tile) -> String {
        format!("{}/{}/{}/{}", ARCGIS_BASE_URL, tile.z, tile.y, tile.x)
    }
}

impl TileProvider for ArcGisProvider {
    fn id(&self) -> &str {
        Self::ID
    }

    fn name(&self) -> &str {
        "ArcGIS (Satellite)"
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
        FetchRequest::new(self.build_url(tile))
    }
}

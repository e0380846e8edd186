//! Google Maps satellite provider.
//!
//! Uses the public `mts` tile servers with the satellite layer (`lyrs=s`).
//! Tile coordinates are passed as `x`, `y` and `z` query parameters.

use crate::coord::Ellipsoid;
use crate::provider::{FetchRequest, TileProvider};
use crate::tile::Tile;

const GOOGLE_BASE_URL: &str = "https://mts1.google.com/vt/lyrs=s";

const MAX_ZOOM: u8 = 21;

const MAX_CONCURRENCY: usize = 5;

/// Google Maps satellite provider.
#[derive(Debug, Clone, Default)]
pub struct GoogleProvider;

impl GoogleProvider {
    /// Registry identifier.
    pub const ID: &'static str = "google";

    /// Creates a new Google satellite provider.
    pub fn new() -> Self {
        Self
    }

    fn build_url(&self, tile: &Tile) -> String {
        format!("{}?x={}&y={}&z={}", GOOGLE_BASE_URL, tile.x, tile.y, tile.z)
    }
}

impl TileProvider for GoogleProvider {
    fn id(&self) -> &str {
        Self::ID
    }

    fn name(&self) -> &str {
        "Google Maps (Satellite)"
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_identity() {
        let provider = GoogleProvider::new();
        assert_eq!(provider.id(), "google");
        assert_eq!(provider.max_zoom(), 21);
    }

    #[test]
    fn test_url_uses_query_parameters() {
        let request = GoogleProvider::new().fetch_request(&Tile::new(1205, 1540, 12));
        assert_eq!(
            request.url,
            "https://mts1.google.com/vt/lyrs=s?x=1205&y=1540&z=12"
        );
    }

    #[test]
    fn test_negative_coordinates_pass_through() {
        let request = GoogleProvider::new().fetch_request(&Tile::new(-1, 0, 1));
        assert!(request.url.ends_with("?x=-1&y=0&z=1"));
    }
}

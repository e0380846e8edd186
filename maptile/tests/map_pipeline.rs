//! End-to-end tests: schema loading, downloading through the disk cache,
//! and compositing, all against an in-process HTTP stand-in.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use image::{ImageFormat, Rgb, RgbImage};
use maptile::cache::{BoxFuture, DiskTileCache, TileStore};
use maptile::coord::{self, Ellipsoid};
use maptile::downloader::Downloader;
use maptile::provider::{
    FetchRequest, HttpClient, HttpResponse, ProviderError, ProviderRegistry, TileProvider,
};
use maptile::service::{MapRequest, MapService, ServiceError};
use maptile::tile::Tile;
use tempfile::TempDir;

/// Serves a solid-colour PNG for any tile URL and a fixed body for
/// registered URLs. Counts tile requests.
#[derive(Default)]
struct FakeTileServer {
    documents: HashMap<String, Bytes>,
    tile_requests: AtomicUsize,
}

impl FakeTileServer {
    fn with_document(mut self, url: &str, body: &str) -> Self {
        self.documents
            .insert(url.to_string(), Bytes::copy_from_slice(body.as_bytes()));
        self
    }

    fn tile_requests(&self) -> usize {
        self.tile_requests.load(Ordering::SeqCst)
    }
}

fn png(color: [u8; 3]) -> Bytes {
    let img = RgbImage::from_pixel(16, 16, Rgb(color));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    Bytes::from(out.into_inner())
}

impl HttpClient for FakeTileServer {
    fn send<'a>(
        &'a self,
        request: &'a FetchRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, ProviderError>> {
        Box::pin(async move {
            if let Some(body) = self.documents.get(&request.url) {
                return Ok(HttpResponse {
                    status: 200,
                    body: body.clone(),
                });
            }
            self.tile_requests.fetch_add(1, Ordering::SeqCst);
            Ok(HttpResponse {
                status: 200,
                body: png([40, 90, 160]),
            })
        })
    }
}

const SCHEMA_URL: &str = "https://config.test/providers.json";

const SCHEMA: &str = r#"[
    {
        "name": "Test Imagery",
        "id": "testimg",
        "max_jobs": 3,
        "max_zoom": 17,
        "proj": "wgs84",
        "request": {
            "url": "https://tiles.test/{z}/{x}/{y}.png",
            "headers": [{ "key": "Referer", "value": "https://tiles.test" }]
        }
    }
]"#;

#[tokio::test]
async fn schema_provider_renders_through_disk_cache() {
    let server = Arc::new(FakeTileServer::default().with_document(SCHEMA_URL, SCHEMA));

    let mut registry = ProviderRegistry::with_builtin();
    registry
        .extend_from_schema(SCHEMA_URL, server.as_ref())
        .await
        .unwrap();
    assert_eq!(registry.ids(), vec!["arcgis", "google", "osm", "testimg"]);

    let provider = registry.get("testimg").unwrap();
    assert_eq!(provider.max_concurrency(), 3);
    assert_eq!(provider.ellipsoid(), Ellipsoid::WGS84);

    let temp = TempDir::new().unwrap();
    let cache = Arc::new(DiskTileCache::open(temp.path(), Duration::from_secs(3600)).unwrap());
    let service = MapService::new(registry, Downloader::new(server.clone()))
        .with_cache(cache.clone());

    let request = MapRequest {
        provider: "testimg".to_string(),
        lat: 59.94,
        lon: 30.31,
        zoom: 12,
        side: Some(3),
    };

    let first = service.render(&request).await.unwrap();
    assert_eq!(server.tile_requests(), 9);
    let decoded = image::load_from_memory(&first.jpeg).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (48, 48));

    let (x, y) = coord::project(59.94, 30.31, 12, &Ellipsoid::WGS84).unwrap();
    assert!(first.center.same_cell(&Tile::new(x, y, 12)));

    // background saves land in the cache namespace of the provider id
    for _ in 0..200 {
        if cache.stats().await.unwrap().total_entries() == 9 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    for tile in first.center.nearby(3) {
        assert!(cache.blob_path("testimg", &tile).exists());
    }

    let second = service.render(&request).await.unwrap();
    assert_eq!(server.tile_requests(), 9);
    assert_eq!(second.tiles, 9);

    let stats = cache.stats().await.unwrap();
    assert_eq!(stats.entries, vec![("testimg".to_string(), 9)]);
    assert_eq!(stats.blob_files, 9);
}

#[tokio::test]
async fn expired_cache_goes_back_to_network() {
    let server = Arc::new(FakeTileServer::default());
    let temp = TempDir::new().unwrap();
    let cache: Arc<dyn TileStore> = Arc::new(DiskTileCache::open(temp.path(), Duration::ZERO).unwrap());
    let downloader = Downloader::new(server.clone());
    let provider = ProviderRegistry::with_builtin().get("osm").unwrap();
    let tiles = vec![Tile::new(3, 4, 5)];

    downloader
        .download(Some(cache.clone()), provider.clone(), tiles.clone())
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    downloader
        .download(Some(cache), provider, tiles)
        .await
        .unwrap();

    assert_eq!(server.tile_requests(), 2);
}

#[tokio::test]
async fn schema_from_file_rejects_unknown_projection() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("providers.json");
    std::fs::write(&path, SCHEMA.replace("wgs84", "mercator2")).unwrap();

    let server = FakeTileServer::default();
    let result = ProviderRegistry::from_schema(path.to_str().unwrap(), &server).await;
    let err = result.err().unwrap();
    assert!(err
        .to_string()
        .contains("Projection mercator2 not found for provider Test Imagery"));
}

#[tokio::test]
async fn unknown_provider_is_reported() {
    let server = Arc::new(FakeTileServer::default());
    let service = MapService::new(ProviderRegistry::with_builtin(), Downloader::new(server.clone()));

    let err = service
        .render(&MapRequest {
            provider: "nope".to_string(),
            lat: 0.0,
            lon: 0.0,
            zoom: 3,
            side: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Provider(_)));
    assert_eq!(err.to_string(), "Provider nope not found");
    assert_eq!(server.tile_requests(), 0);
}

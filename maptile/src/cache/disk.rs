//! Disk-backed tile cache with TTL.
//!
//! Two tiers live under one root directory: the SQLite metadata index
//! (`index.db`) records when each tile was written, and the blob store holds
//! the encoded bytes. An entry is valid while `now < written + ttl`.
//!
//! Saves write the blob first and the index row second. A crash between the
//! two leaves an orphan blob with no index row, which reads as a miss and is
//! overwritten by the next save.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use bytes::Bytes;
use parking_lot::RwLock;
use tracing::{debug, trace};

use super::blob::{BlobStore, BlobUsage};
use super::index::{MetadataIndex, INDEX_FILE};
use super::traits::{BoxFuture, CacheError, TileStore};
use crate::tile::Tile;

/// Snapshot of what the cache holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Index rows per vendor, sorted by vendor.
    pub entries: Vec<(String, u64)>,
    pub blob_files: u64,
    pub blob_bytes: u64,
}

impl CacheStats {
    pub fn total_entries(&self) -> u64 {
        self.entries.iter().map(|(_, n)| n).sum()
    }
}

/// Result of [`DiskTileCache::clear`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearResult {
    pub entries_removed: u64,
    pub files_removed: u64,
    pub bytes_freed: u64,
}

struct Inner {
    ttl: Duration,
    index: MetadataIndex,
    blobs: BlobStore,
    /// Loads take it shared, saves and clears take it exclusive.
    lock: RwLock<()>,
}

/// TTL cache over a metadata index and blob files.
///
/// Cheap to clone; clones share the same index connection and lock.
#[derive(Clone)]
pub struct DiskTileCache {
    inner: Arc<Inner>,
}

impl DiskTileCache {
    /// Open (or create) a cache rooted at `root`.
    pub fn open(root: impl Into<PathBuf>, ttl: Duration) -> Result<Self, CacheError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        let index = MetadataIndex::open(&root.join(INDEX_FILE))?;
        debug!(root = %root.display(), ttl_secs = ttl.as_secs(), "Opened tile cache");
        Ok(Self {
            inner: Arc::new(Inner {
                ttl,
                index,
                blobs: BlobStore::new(root),
                lock: RwLock::new(()),
            }),
        })
    }

    pub fn root(&self) -> &Path {
        self.inner.blobs.root()
    }

    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    /// Path where a tile's blob is (or would be) stored.
    pub fn blob_path(&self, vendor: &str, tile: &Tile) -> PathBuf {
        self.inner.blobs.path_for(vendor, tile)
    }

    /// Count index rows and blob bytes.
    pub async fn stats(&self) -> Result<CacheStats, CacheError> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let _guard = inner.lock.read();
            let entries = inner.index.counts()?;
            let BlobUsage { files, bytes } = inner.blobs.usage()?;
            Ok(CacheStats {
                entries,
                blob_files: files,
                blob_bytes: bytes,
            })
        })
        .await
        .map_err(|e| CacheError::TaskJoin(e.to_string()))?
    }

    /// Drop every entry and blob.
    pub async fn clear(&self) -> Result<ClearResult, CacheError> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let _guard = inner.lock.write();
            let entries_removed = inner.index.clear()?;
            let usage = inner.blobs.clear()?;
            Ok(ClearResult {
                entries_removed,
                files_removed: usage.files,
                bytes_freed: usage.bytes,
            })
        })
        .await
        .map_err(|e| CacheError::TaskJoin(e.to_string()))?
    }
}

impl Inner {
    fn load_blocking(&self, vendor: &str, tile: &Tile) -> Option<Bytes> {
        let _guard = self.lock.read();
        let written = match self.index.get(vendor, &tile.cache_key()) {
            Ok(Some(written)) => written,
            Ok(None) => return None,
            Err(e) => {
                debug!(vendor, tile = %tile, error = %e, "Index lookup failed");
                return None;
            }
        };
        if !is_fresh(written, self.ttl, SystemTime::now()) {
            trace!(vendor, tile = %tile, "Cache entry expired");
            return None;
        }
        match self.blobs.read(vendor, tile) {
            Ok(data) => Some(Bytes::from(data)),
            Err(e) => {
                debug!(vendor, tile = %tile, error = %e, "Blob unreadable");
                None
            }
        }
    }

    fn save_blocking(&self, vendor: &str, tile: &Tile) -> Result<(), CacheError> {
        let image = tile
            .image()
            .ok_or_else(|| CacheError::MissingImage(tile.to_string()))?;
        let _guard = self.lock.write();
        self.blobs.write(vendor, tile, image)?;
        self.index.put(vendor, &tile.cache_key(), SystemTime::now())?;
        Ok(())
    }
}

/// `now < written + ttl`. A zero TTL is never fresh.
fn is_fresh(written: SystemTime, ttl: Duration, now: SystemTime) -> bool {
    written.checked_add(ttl).is_some_and(|expires| now < expires)
}

impl TileStore for DiskTileCache {
    fn load<'a>(&'a self, vendor: &'a str, tile: &'a Tile) -> BoxFuture<'a, Option<Bytes>> {
        let inner = Arc::clone(&self.inner);
        let vendor = vendor.to_string();
        let tile = tile.clone();
        Box::pin(async move {
            tokio::task::spawn_blocking(move || inner.load_blocking(&vendor, &tile))
                .await
                .ok()
                .flatten()
        })
    }

    fn save<'a>(&'a self, vendor: &'a str, tile: &'a Tile) -> BoxFuture<'a, Result<(), CacheError>> {
        let inner = Arc::clone(&self.inner);
        let vendor = vendor.to_string();
        let tile = tile.clone();
        Box::pin(async move {
            tokio::task::spawn_blocking(move || inner.save_blocking(&vendor, &tile))
                .await
                .map_err(|e| CacheError::TaskJoin(e.to_string()))?
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DAY: Duration = Duration::from_secs(86_400);

    fn cache(ttl: Duration) -> (TempDir, DiskTileCache) {
        let temp = TempDir::new().unwrap();
        let cache = DiskTileCache::open(temp.path().join("cache"), ttl).unwrap();
        (temp, cache)
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let (_temp, cache) = cache(DAY);
        let tile = Tile::new(1, 2, 3).with_image(vec![0xFF, 0xD8, 0x01]);

        cache.save("arcgis", &tile).await.unwrap();
        let loaded = cache.load("arcgis", &Tile::new(1, 2, 3)).await.unwrap();
        assert_eq!(loaded.as_ref(), &[0xFF, 0xD8, 0x01]);
    }

    #[tokio::test]
    async fn test_blob_lands_at_layout_path() {
        let (_temp, cache) = cache(DAY);
        let tile = Tile::new(7, 9, 4).with_image(vec![1]);
        cache.save("osm", &tile).await.unwrap();

        let expected = cache.root().join("osm").join("4").join("7_9.jpeg");
        assert_eq!(cache.blob_path("osm", &tile), expected);
        assert_eq!(std::fs::read(expected).unwrap(), vec![1]);
        assert!(cache.root().join(INDEX_FILE).exists());
    }

    #[tokio::test]
    async fn test_never_written_is_miss() {
        let (_temp, cache) = cache(DAY);
        assert!(cache.load("arcgis", &Tile::new(0, 0, 1)).await.is_none());
    }

    #[tokio::test]
    async fn test_zero_ttl_is_always_miss() {
        let (_temp, cache) = cache(Duration::ZERO);
        let tile = Tile::new(1, 1, 1).with_image(vec![5]);
        cache.save("arcgis", &tile).await.unwrap();

        assert!(cache.blob_path("arcgis", &tile).exists());
        assert!(cache.load("arcgis", &tile).await.is_none());
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let (_temp, cache) = cache(Duration::from_secs(1));
        let tile = Tile::new(1, 1, 1).with_image(vec![5]);
        cache.save("arcgis", &tile).await.unwrap();

        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert!(cache.load("arcgis", &tile).await.is_none());
    }

    #[tokio::test]
    async fn test_missing_blob_is_miss() {
        let (_temp, cache) = cache(DAY);
        let tile = Tile::new(3, 3, 3).with_image(vec![5]);
        cache.save("arcgis", &tile).await.unwrap();

        std::fs::remove_file(cache.blob_path("arcgis", &tile)).unwrap();
        assert!(cache.load("arcgis", &tile).await.is_none());
    }

    #[tokio::test]
    async fn test_vendor_namespaces_are_isolated() {
        let (_temp, cache) = cache(DAY);
        let tile = Tile::new(1, 2, 3).with_image(vec![1]);
        cache.save("google", &tile).await.unwrap();

        assert!(cache.load("arcgis", &tile).await.is_none());
        assert!(cache.load("google", &tile).await.is_some());
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let (_temp, cache) = cache(DAY);
        cache
            .save("osm", &Tile::new(1, 2, 3).with_image(vec![1]))
            .await
            .unwrap();
        cache
            .save("osm", &Tile::new(1, 2, 3).with_image(vec![2, 2]))
            .await
            .unwrap();

        let loaded = cache.load("osm", &Tile::new(1, 2, 3)).await.unwrap();
        assert_eq!(loaded.as_ref(), &[2, 2]);
    }

    #[tokio::test]
    async fn test_save_without_image_fails() {
        let (_temp, cache) = cache(DAY);
        let err = cache.save("osm", &Tile::new(1, 2, 3)).await.unwrap_err();
        assert!(matches!(err, CacheError::MissingImage(_)));
    }

    #[tokio::test]
    async fn test_reopen_keeps_entries() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("cache");
        let tile = Tile::new(4, 5, 6).with_image(vec![8]);
        {
            let cache = DiskTileCache::open(&root, DAY).unwrap();
            cache.save("osm", &tile).await.unwrap();
        }
        let cache = DiskTileCache::open(&root, DAY).unwrap();
        assert!(cache.load("osm", &tile).await.is_some());
    }

    #[tokio::test]
    async fn test_stats_and_clear() {
        let (_temp, cache) = cache(DAY);
        cache
            .save("osm", &Tile::new(0, 0, 1).with_image(vec![1, 2, 3]))
            .await
            .unwrap();
        cache
            .save("arcgis", &Tile::new(0, 0, 1).with_image(vec![4]))
            .await
            .unwrap();

        let stats = cache.stats().await.unwrap();
        assert_eq!(stats.total_entries(), 2);
        assert_eq!(stats.blob_files, 2);
        assert_eq!(stats.blob_bytes, 4);

        let cleared = cache.clear().await.unwrap();
        assert_eq!(cleared.entries_removed, 2);
        assert_eq!(cleared.files_removed, 2);
        assert_eq!(cleared.bytes_freed, 4);
        assert_eq!(cache.stats().await.unwrap(), CacheStats::default());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_saves_and_loads() {
        let (_temp, cache) = cache(DAY);
        let mut handles = Vec::new();
        for i in 0..16i64 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                let tile = Tile::new(i, i, 5).with_image(vec![i as u8]);
                cache.save("osm", &tile).await.unwrap();
                cache.load("osm", &tile).await
            }));
        }
        for (i, handle) in handles.into_iter().enumerate() {
            let loaded = handle.await.unwrap().unwrap();
            assert_eq!(loaded.as_ref(), &[i as u8]);
        }
    }

    #[test]
    fn test_is_fresh_boundary() {
        let written = SystemTime::UNIX_EPOCH + Duration::from_secs(1000);
        let ttl = Duration::from_secs(60);
        assert!(is_fresh(written, ttl, written));
        assert!(is_fresh(written, ttl, written + Duration::from_secs(59)));
        assert!(!is_fresh(written, ttl, written + ttl));
        assert!(!is_fresh(written, Duration::ZERO, written));
    }
}

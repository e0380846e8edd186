//! Core traits for the tile cache.
//!
//! The downloader talks to the cache only through [`TileStore`], so the
//! disk-backed implementation can be swapped for an in-memory one in tests.
//!
//! # Design Principles
//!
//! - **Misses are not errors**: `load` answers `Option`, every failure to
//!   produce valid bytes is reported as `None`
//! - **Vendor namespaces**: the same `(x, y, z)` from two vendors are
//!   distinct entries
//! - **Dyn-compatible**: Uses `Pin<Box<dyn Future>>` for trait object support

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use thiserror::Error;

use crate::tile::Tile;

/// Errors that can occur while persisting to the cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// I/O error on the blob store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata index failure.
    #[error("Index error: {0}")]
    Index(#[from] rusqlite::Error),

    /// Attempted to save a tile without image bytes.
    #[error("Tile {0} has no image to cache")]
    MissingImage(String),

    /// Blocking cache task panicked or was cancelled.
    #[error("Cache task failed: {0}")]
    TaskJoin(String),
}

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Cache-aside store for encoded tile images.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`; the downloader calls `load`
/// from every worker and `save` from detached background tasks.
pub trait TileStore: Send + Sync {
    /// Fetch the cached image for a tile.
    ///
    /// Returns `None` for every condition that does not yield valid bytes:
    /// missing entry, expired entry, unreadable blob.
    fn load<'a>(&'a self, vendor: &'a str, tile: &'a Tile) -> BoxFuture<'a, Option<Bytes>>;

    /// Persist the tile's image and stamp it with the current time.
    ///
    /// Overwrites any previous entry for the same key.
    ///
    /// # Errors
    ///
    /// [`CacheError::MissingImage`] when the tile carries no bytes, otherwise
    /// whatever the backing store reports.
    fn save<'a>(&'a self, vendor: &'a str, tile: &'a Tile) -> BoxFuture<'a, Result<(), CacheError>>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory store that counts calls; used by downloader tests.
    #[derive(Default)]
    pub struct MemoryTileStore {
        entries: Mutex<HashMap<(String, String), Bytes>>,
        loads: AtomicUsize,
        saves: AtomicUsize,
        fail_saves: bool,
    }

    impl MemoryTileStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Store whose saves always fail.
        pub fn failing_saves() -> Self {
            Self {
                fail_saves: true,
                ..Self::default()
            }
        }

        /// Seed an entry directly.
        pub fn insert(&self, vendor: &str, tile: &Tile, data: impl Into<Bytes>) {
            self.entries
                .lock()
                .insert((vendor.to_string(), tile.cache_key()), data.into());
        }

        pub fn contains(&self, vendor: &str, tile: &Tile) -> bool {
            self.entries
                .lock()
                .contains_key(&(vendor.to_string(), tile.cache_key()))
        }

        pub fn load_count(&self) -> usize {
            self.loads.load(Ordering::SeqCst)
        }

        pub fn save_count(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }
    }

    impl TileStore for MemoryTileStore {
        fn load<'a>(&'a self, vendor: &'a str, tile: &'a Tile) -> BoxFuture<'a, Option<Bytes>> {
            Box::pin(async move {
                self.loads.fetch_add(1, Ordering::SeqCst);
                self.entries
                    .lock()
                    .get(&(vendor.to_string(), tile.cache_key()))
                    .cloned()
            })
        }

        fn save<'a>(
            &'a self,
            vendor: &'a str,
            tile: &'a Tile,
        ) -> BoxFuture<'a, Result<(), CacheError>> {
            Box::pin(async move {
                self.saves.fetch_add(1, Ordering::SeqCst);
                if self.fail_saves {
                    return Err(CacheError::Io(std::io::Error::other("disk full")));
                }
                let image = tile
                    .image()
                    .cloned()
                    .ok_or_else(|| CacheError::MissingImage(tile.to_string()))?;
                self.insert(vendor, tile, image);
                Ok(())
            })
        }
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryTileStore::new();
        let tile = Tile::new(1, 2, 3).with_image(vec![9, 9]);

        assert!(store.load("v", &tile).await.is_none());
        store.save("v", &tile).await.unwrap();
        assert_eq!(store.load("v", &tile).await.unwrap().as_ref(), &[9, 9]);
        assert!(store.load("other", &tile).await.is_none());
        assert_eq!(store.load_count(), 3);
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_cache_error_display() {
        let err = CacheError::MissingImage(Tile::new(1, 2, 3).to_string());
        assert_eq!(err.to_string(), "Tile x=1, y=2, z=3 has no image to cache");
    }

    #[test]
    fn test_cache_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cache_err: CacheError = io_err.into();
        assert!(matches!(cache_err, CacheError::Io(_)));
    }
}

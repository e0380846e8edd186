//! Tile cache.
//!
//! [`TileStore`] is the seam the downloader uses; [`DiskTileCache`] is the
//! on-disk implementation with a TTL.

mod blob;
mod disk;
mod index;
mod traits;

pub use blob::{BlobStore, BlobUsage};
pub use disk::{CacheStats, ClearResult, DiskTileCache};
pub use index::{decode_timestamp, encode_timestamp, MetadataIndex, INDEX_FILE};
pub use traits::{BoxFuture, CacheError, TileStore};

#[cfg(test)]
pub use traits::tests::MemoryTileStore;

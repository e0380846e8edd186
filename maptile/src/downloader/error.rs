use thiserror::Error;

use crate::provider::ProviderError;
use crate::tile::Tile;

/// A batch download stopped at its first failed tile.
#[derive(Debug, Error)]
#[error("Failed to download tile {tile}: {source}")]
pub struct DownloadError {
    /// The tile whose fetch failed.
    pub tile: Tile,
    /// Why it failed.
    #[source]
    pub source: ProviderError,
    /// Tiles that finished before the failure was observed.
    pub completed: Vec<Tile>,
}

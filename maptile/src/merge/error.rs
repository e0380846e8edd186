use thiserror::Error;

/// Errors that can occur while compositing a tile grid.
#[derive(Debug, Error)]
pub enum MergeError {
    /// Grid side must be at least one.
    #[error("Invalid grid side {0}")]
    InvalidSide(u32),

    /// A tile was passed without image bytes.
    #[error("Tile {0} has no image")]
    MissingImage(String),

    /// The center tile is not among the inputs.
    #[error("Center tile {0} not found")]
    MissingCenter(String),

    /// The composite's pixel dimensions do not fit in `u32`.
    #[error("Canvas for side {side} with {tile_width}x{tile_height} tiles is too large")]
    CanvasTooLarge {
        side: u32,
        tile_width: u32,
        tile_height: u32,
    },

    /// A placed tile could not be decoded.
    #[error("Failed to decode tile {tile}: {source}")]
    Decode {
        tile: String,
        #[source]
        source: image::ImageError,
    },

    /// The composite could not be encoded.
    #[error("Failed to encode composite: {0}")]
    Encode(#[source] image::ImageError),
}

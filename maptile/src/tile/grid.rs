//! Tile coordinates and neighbourhood grid.

use std::fmt;

use bytes::Bytes;

/// A grid cell `(x, y, z)` with an optional encoded image.
///
/// `x`/`y` are projected tile indices and may be negative when a
/// neighbourhood reaches past the edge of the world. The image is attached
/// at most once via [`Tile::with_image`] and is immutable afterwards.
///
/// # Example
///
/// ```
/// use maptile::tile::Tile;
///
/// let tile = Tile::new(2, 2, 0);
/// let grid = tile.nearby(3);
/// assert_eq!(grid.len(), 9);
/// assert!(grid.iter().any(|t| t.same_cell(&tile)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tile {
    /// Column index.
    pub x: i64,
    /// Row index.
    pub y: i64,
    /// Zoom level.
    pub z: u8,
    image: Option<Bytes>,
}

impl Tile {
    /// Create a tile without image data.
    pub fn new(x: i64, y: i64, z: u8) -> Self {
        Self { x, y, z, image: None }
    }

    /// Attach image bytes, consuming the image-less value.
    pub fn with_image(self, image: impl Into<Bytes>) -> Self {
        Self {
            image: Some(image.into()),
            ..self
        }
    }

    /// The attached image bytes, if any.
    pub fn image(&self) -> Option<&Bytes> {
        self.image.as_ref()
    }

    /// True when non-empty image bytes are attached.
    pub fn has_image(&self) -> bool {
        self.image.as_ref().is_some_and(|b| !b.is_empty())
    }

    /// True when both tiles address the same `(x, y, z)` cell.
    pub fn same_cell(&self, other: &Tile) -> bool {
        self.x == other.x && self.y == other.y && self.z == other.z
    }

    /// Index key for this cell: `"<x>_<y>_<z>"`.
    pub fn cache_key(&self) -> String {
        format!("{}_{}_{}", self.x, self.y, self.z)
    }

    /// Blob file name for this cell within its zoom directory: `"<x>_<y>.jpeg"`.
    pub fn blob_name(&self) -> String {
        format!("{}_{}.jpeg", self.x, self.y)
    }

    /// Expand this tile into a `side × side` block of image-less tiles.
    ///
    /// The block is anchored at `(x - side/2, y - side/2)` using truncating
    /// division, so for even `side` the block leans toward lower
    /// coordinates. Tiles are emitted column by column: the outer loop walks
    /// X offsets and the inner loop walks Y offsets. `side == 0` yields an
    /// empty vector.
    pub fn nearby(&self, side: u32) -> Vec<Tile> {
        let side = side as i64;
        let start_x = self.x - side / 2;
        let start_y = self.y - side / 2;

        let mut tiles = Vec::with_capacity((side * side) as usize);
        for i in 0..side {
            for j in 0..side {
                tiles.push(Tile::new(start_x + i, start_y + j, self.z));
            }
        }
        tiles
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x={}, y={}, z={}", self.x, self.y, self.z)
    }
}

//! Grid compositor.
//!
//! Places a `side × side` block of tiles around a center tile onto one
//! canvas and encodes it as JPEG. Placement is computed from coordinates:
//! a tile lands in cell `(x - cx + side/2, y - cy + side/2)` and tiles
//! outside the grid are dropped. Cells with no tile stay blank.

mod error;

pub use error::MergeError;

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageReader, RgbaImage};
use tracing::debug;

use crate::tile::Tile;

/// JPEG quality of the composite.
pub const JPEG_QUALITY: u8 = 100;

/// Composite `tiles` into one JPEG centered on `center`.
///
/// Every tile must carry image bytes and `center`'s cell must be among
/// them. Tile pixel size is taken from the first decoded tile.
///
/// # Errors
///
/// Fails on `side == 0`, a tile without image, a missing center, or any
/// decode or encode failure. No partial image is ever returned.
pub fn merge(side: u32, center: &Tile, tiles: &[Tile]) -> Result<Vec<u8>, MergeError> {
    if side == 0 {
        return Err(MergeError::InvalidSide(side));
    }
    if let Some(tile) = tiles.iter().find(|t| !t.has_image()) {
        return Err(MergeError::MissingImage(tile.to_string()));
    }
    if !tiles.iter().any(|t| t.same_cell(center)) {
        return Err(MergeError::MissingCenter(center.to_string()));
    }

    let mut ordered: Vec<&Tile> = tiles.iter().collect();
    ordered.sort_by_key(|t| (t.y, t.x));

    let half = i64::from(side / 2);
    let mut placed = Vec::with_capacity(ordered.len());
    for tile in ordered {
        let Some(cell) = grid_cell(side, half, center, tile) else {
            debug!(tile = %tile, center = %center, "Tile outside grid, dropped");
            continue;
        };
        placed.push((cell, decode(tile)?));
    }

    let Some((_, first)) = placed.first() else {
        return Err(MergeError::MissingCenter(center.to_string()));
    };
    let (tile_w, tile_h) = (first.width(), first.height());

    let (width, height) = canvas_size(side, tile_w, tile_h)?;

    let mut canvas = RgbaImage::new(width, height);
    for ((col, row), image) in &placed {
        image::imageops::replace(
            &mut canvas,
            image,
            i64::from(*col) * i64::from(tile_w),
            i64::from(*row) * i64::from(tile_h),
        );
    }

    encode(canvas)
}

/// Canvas dimensions for a `side × side` grid of `tile_w × tile_h` tiles.
fn canvas_size(side: u32, tile_w: u32, tile_h: u32) -> Result<(u32, u32), MergeError> {
    let too_large = || MergeError::CanvasTooLarge {
        side,
        tile_width: tile_w,
        tile_height: tile_h,
    };
    let width = tile_w.checked_mul(side).ok_or_else(too_large)?;
    let height = tile_h.checked_mul(side).ok_or_else(too_large)?;
    // RGBA buffer length must fit in memory addressing too
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(too_large)?;
    Ok((width, height))
}

/// Grid cell `(col, row)` for a tile, or `None` when it falls outside.
fn grid_cell(side: u32, half: i64, center: &Tile, tile: &Tile) -> Option<(u32, u32)> {
    let col = tile.x - center.x + half;
    let row = tile.y - center.y + half;
    let range = 0..i64::from(side);
    if range.contains(&col) && range.contains(&row) {
        Some((col as u32, row as u32))
    } else {
        None
    }
}

fn decode(tile: &Tile) -> Result<RgbaImage, MergeError> {
    let bytes: &[u8] = tile.image().map(|b| &b[..]).unwrap_or_default();
    let decode_err = |source: image::ImageError| MergeError::Decode {
        tile: tile.to_string(),
        source,
    };
    let image = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?
        .decode()
        .map_err(decode_err)?;
    Ok(image.to_rgba8())
}

fn encode(canvas: RgbaImage) -> Result<Vec<u8>, MergeError> {
    let rgb = DynamicImage::ImageRgba8(canvas).to_rgb8();
    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
    rgb.write_with_encoder(encoder).map_err(MergeError::Encode)?;
    Ok(out)
}

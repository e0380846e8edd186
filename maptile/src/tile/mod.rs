//! Tile value type and grid neighbourhood expansion.
//!
//! A [`Tile`] addresses one cell of the zoom pyramid and, once downloaded,
//! carries the raw encoded image bytes for that cell.

mod grid;

pub use grid::Tile;

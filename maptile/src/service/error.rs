use thiserror::Error;

use crate::coord::CoordError;
use crate::downloader::DownloadError;
use crate::merge::MergeError;
use crate::provider::RegistryError;

/// Why a composite map request failed.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Unknown provider id.
    #[error(transparent)]
    Provider(#[from] RegistryError),

    /// Zoom outside what the provider serves.
    #[error("Zoom {zoom} out of range for provider {provider}: must be between {min} and {max}")]
    InvalidZoom {
        provider: String,
        zoom: u8,
        min: u8,
        max: u8,
    },

    /// Grid side outside `1..=max_side`.
    #[error("Side {side} out of range: must be between 1 and {max}")]
    InvalidSide { side: u32, max: u32 },

    /// Coordinates cannot be projected.
    #[error(transparent)]
    Projection(#[from] CoordError),

    #[error("Error occurred when downloading tiles: {0}")]
    Download(#[from] DownloadError),

    #[error("Error occurred when merging tiles: {0}")]
    Merge(#[from] MergeError),

    /// Blocking merge task panicked or was cancelled.
    #[error("Merge task failed: {0}")]
    TaskJoin(String),
}

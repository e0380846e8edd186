//! maptile - satellite map composites from web tile providers
//!
//! Projects a latitude/longitude onto a provider's tile grid, downloads the
//! surrounding block of tiles concurrently (through an optional TTL disk
//! cache), and stitches them into a single JPEG.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use maptile::downloader::Downloader;
//! use maptile::provider::{ProviderRegistry, ReqwestClient};
//! use maptile::service::{MapRequest, MapService};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(ReqwestClient::new()?);
//! let service = MapService::new(ProviderRegistry::with_builtin(), Downloader::new(client));
//! let image = service
//!     .render(&MapRequest {
//!         provider: "arcgis".to_string(),
//!         lat: 48.8584,
//!         lon: 2.2945,
//!         zoom: 17,
//!         side: Some(3),
//!     })
//!     .await?;
//! std::fs::write("eiffel.jpeg", &image.jpeg)?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod coord;
pub mod downloader;
pub mod logging;
pub mod merge;
pub mod provider;
pub mod service;
pub mod tile;

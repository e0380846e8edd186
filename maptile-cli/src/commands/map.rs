//! `maptile map`: build one composite image.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use maptile::cache::DiskTileCache;
use maptile::config::ConfigFile;
use maptile::downloader::Downloader;
use maptile::provider::ReqwestClient;
use maptile::service::{MapRequest, MapService};
use tracing::debug;

use super::common::{build_registry, format_size};
use crate::error::CliError;

/// Arguments for the map command.
#[derive(Debug, Args)]
pub struct MapArgs {
    /// Provider id (defaults to [provider] default in config.ini)
    #[arg(long)]
    pub provider: Option<String>,

    /// Latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,

    /// Zoom level
    #[arg(long)]
    pub zoom: u8,

    /// Tiles per side of the square grid
    #[arg(long)]
    pub side: Option<u32>,

    /// Output JPEG path
    #[arg(long, short)]
    pub output: PathBuf,

    /// Bypass the disk cache even if enabled
    #[arg(long)]
    pub no_cache: bool,
}

impl MapArgs {
    fn to_request(&self, config: &ConfigFile) -> MapRequest {
        MapRequest {
            provider: self
                .provider
                .clone()
                .unwrap_or_else(|| config.provider.default.clone()),
            lat: self.lat,
            lon: self.lon,
            zoom: self.zoom,
            side: self.side,
        }
    }
}

/// Run the map command.
pub async fn run(args: MapArgs, config: &ConfigFile) -> Result<(), CliError> {
    let client = Arc::new(ReqwestClient::with_timeout(config.download.timeout)?);
    let registry = build_registry(config, client.as_ref()).await?;

    let mut service = MapService::new(registry, Downloader::new(client))
        .with_side_limits(config.map.max_side, config.map.default_side);

    if config.cache.enabled && !args.no_cache {
        let cache = DiskTileCache::open(&config.cache.directory, config.cache.ttl())?;
        debug!(root = %cache.root().display(), "Using disk cache");
        service = service.with_cache(Arc::new(cache));
    }

    let request = args.to_request(config);
    let image = service.render(&request).await?;

    std::fs::write(&args.output, &image.jpeg).map_err(|error| CliError::FileWrite {
        path: args.output.display().to_string(),
        error,
    })?;

    println!(
        "Saved {}x{} grid around tile ({}) from {} to {} ({})",
        image.side,
        image.side,
        image.center,
        request.provider,
        args.output.display(),
        format_size(image.jpeg.len() as u64)
    );
    Ok(())
}

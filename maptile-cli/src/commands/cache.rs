//! Cache management CLI commands.

use clap::Subcommand;
use maptile::cache::DiskTileCache;
use maptile::config::ConfigFile;

use super::common::format_size;
use crate::error::CliError;

/// Cache action subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Clear the disk cache, removing all cached tiles
    Clear,
    /// Show disk cache statistics
    Stats,
}

/// Run a cache subcommand.
pub async fn run(action: CacheAction, config: &ConfigFile) -> Result<(), CliError> {
    let cache = DiskTileCache::open(&config.cache.directory, config.cache.ttl())?;

    match action {
        CacheAction::Clear => {
            println!("Clearing disk cache at: {}", cache.root().display());
            let result = cache.clear().await?;
            println!(
                "Removed {} entries and {} files, freed {}",
                result.entries_removed,
                result.files_removed,
                format_size(result.bytes_freed)
            );
        }
        CacheAction::Stats => {
            let stats = cache.stats().await?;
            println!("Disk cache: {}", cache.root().display());
            println!("  Enabled: {}", config.cache.enabled);
            println!("  TTL:     {} minutes", config.cache.ttl_minutes);
            println!("  Entries: {}", stats.total_entries());
            for (vendor, count) in &stats.entries {
                println!("    {:<12} {}", vendor, count);
            }
            println!("  Files:   {}", stats.blob_files);
            println!("  Size:    {}", format_size(stats.blob_bytes));
        }
    }
    Ok(())
}

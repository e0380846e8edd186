//! Helpers shared across CLI commands.

use maptile::config::ConfigFile;
use maptile::provider::{HttpClient, ProviderRegistry};
use tracing::info;

use crate::error::CliError;

/// Built-in providers plus whatever the configured schema adds.
pub async fn build_registry(
    config: &ConfigFile,
    client: &dyn HttpClient,
) -> Result<ProviderRegistry, CliError> {
    let mut registry = ProviderRegistry::with_builtin();
    if let Some(source) = &config.provider.schema {
        let before = registry.len();
        registry.extend_from_schema(source, client).await?;
        info!(
            source = %source,
            added = registry.len() - before,
            "Loaded provider schema"
        );
    }
    Ok(registry)
}

/// Human-readable byte count.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

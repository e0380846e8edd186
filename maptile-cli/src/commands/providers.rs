//! `maptile providers`: list registered providers.

use maptile::config::ConfigFile;
use maptile::provider::ReqwestClient;

use super::common::build_registry;
use crate::error::CliError;

/// Run the providers command.
pub async fn run(config: &ConfigFile) -> Result<(), CliError> {
    let client = ReqwestClient::with_timeout(config.download.timeout)?;
    let registry = build_registry(config, &client).await?;

    println!("{:<12} {:<28} {:>8} {:>5}", "ID", "NAME", "MAX ZOOM", "JOBS");
    for id in registry.ids() {
        let provider = registry.get(&id).map_err(|e| CliError::Map(e.into()))?;
        let marker = if id == config.provider.default { "*" } else { "" };
        println!(
            "{:<12} {:<28} {:>8} {:>5}",
            format!("{}{}", id, marker),
            provider.name(),
            provider.max_zoom(),
            provider.max_concurrency()
        );
    }
    Ok(())
}

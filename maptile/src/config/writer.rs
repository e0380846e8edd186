//! INI serialization: `ConfigFile` → commented INI string.

use std::path::Path;

use super::settings::ConfigFile;

/// Render a `ConfigFile` as the commented INI written to `config.ini`.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let schema = config.provider.schema.as_deref().unwrap_or("");

    format!(
        r#"[cache]
; Keep downloaded tiles on disk and reuse them until they expire
enabled = {}
directory = {}
; Entry lifetime in minutes (14400 = 10 days)
ttl_minutes = {}

[provider]
; Optional JSON schema (file path or http(s) URL) with extra providers
schema = {}
; Provider used when --provider is not given
default = {}

[map]
; Largest grid side a request may ask for
max_side = {}
; Grid side used when --side is not given
default_side = {}

[download]
; HTTP timeout in seconds
timeout = {}

[logging]
; Also write logs to a file
file_enabled = {}
directory = {}
file = {}
"#,
        config.cache.enabled,
        path_to_string(&config.cache.directory),
        config.cache.ttl_minutes,
        schema,
        config.provider.default,
        config.map.max_side,
        config.map.default_side,
        config.download.timeout,
        config.logging.file_enabled,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

/// Path as a string, with the home directory collapsed back to `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(rest) = path.strip_prefix(&home) {
            return format!("~/{}", rest.display());
        }
    }
    path.display().to_string()
}

//! Settings structs, one per INI section.

use std::path::PathBuf;
use std::time::Duration;

/// Everything read from `config.ini`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub cache: CacheSettings,
    pub provider: ProviderSettings,
    pub map: MapSettings,
    pub download: DownloadSettings,
    pub logging: LoggingSettings,
}

/// `[cache]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    pub enabled: bool,
    pub directory: PathBuf,
    pub ttl_minutes: u64,
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_minutes.saturating_mul(60))
    }
}

/// `[provider]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    /// Schema file path or http(s) URL with extra providers.
    pub schema: Option<String>,
    /// Provider id used when none is given on the command line.
    pub default: String,
}

/// `[map]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapSettings {
    pub max_side: u32,
    pub default_side: u32,
}

/// `[download]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSettings {
    /// HTTP timeout in seconds.
    pub timeout: u64,
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub file_enabled: bool,
    pub directory: PathBuf,
    pub file: String,
}

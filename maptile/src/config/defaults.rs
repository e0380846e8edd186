//! Default values for every configuration setting.

use std::path::PathBuf;

use super::settings::*;

/// Config directory name under the home directory.
pub const CONFIG_DIR_NAME: &str = ".maptile";
pub const CONFIG_FILE_NAME: &str = "config.ini";

pub const DEFAULT_CACHE_ENABLED: bool = false;
/// 10 days.
pub const DEFAULT_CACHE_TTL_MINUTES: u64 = 14_400;

pub const DEFAULT_PROVIDER: &str = "arcgis";

pub const DEFAULT_MAX_SIDE: u32 = 10;
pub const DEFAULT_SIDE: u32 = 3;

pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = crate::provider::DEFAULT_TIMEOUT_SECS;

pub const DEFAULT_LOG_FILE_ENABLED: bool = false;
pub const DEFAULT_LOG_FILE: &str = "maptile.log";

/// `~/.maptile`, or `./.maptile` when no home directory is known.
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// `~/.maptile/config.ini`.
pub fn config_file_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}

pub fn default_cache_dir() -> PathBuf {
    config_directory().join("cache")
}

pub fn default_log_dir() -> PathBuf {
    config_directory().join("logs")
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: DEFAULT_CACHE_ENABLED,
            directory: default_cache_dir(),
            ttl_minutes: DEFAULT_CACHE_TTL_MINUTES,
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            schema: None,
            default: DEFAULT_PROVIDER.to_string(),
        }
    }
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            max_side: DEFAULT_MAX_SIDE,
            default_side: DEFAULT_SIDE,
        }
    }
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file_enabled: DEFAULT_LOG_FILE_ENABLED,
            directory: default_log_dir(),
            file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

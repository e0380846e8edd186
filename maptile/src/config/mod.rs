//! User configuration from `~/.maptile/config.ini`.
//!
//! Settings structs live in `settings`, constants in `defaults`,
//! parsing in `parser`, and serialization in `writer`.

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::ConfigFileError;
pub use settings::{
    CacheSettings, ConfigFile, DownloadSettings, LoggingSettings, MapSettings, ProviderSettings,
};

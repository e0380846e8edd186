//! Configuration management CLI commands.

use std::path::Path;

use clap::Subcommand;
use maptile::config::ConfigFile;

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,
    /// Write a default configuration file if none exists
    Init,
}

/// Run a config subcommand against the config file at `path`.
pub fn run(command: ConfigCommands, path: &Path) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => {
            println!("{}", path.display());
        }
        ConfigCommands::Init => {
            if ConfigFile::ensure_exists_at(path)? {
                println!("Created {}", path.display());
            } else {
                println!("{} already exists", path.display());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_loadable_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("maptile").join("config.ini");

        run(ConfigCommands::Init, &path).unwrap();
        assert!(path.exists());
        assert_eq!(ConfigFile::load_from(&path).unwrap(), ConfigFile::default());

        // second init leaves the file alone
        std::fs::write(&path, "[map]\ndefault_side = 1\n").unwrap();
        run(ConfigCommands::Init, &path).unwrap();
        assert_eq!(ConfigFile::load_from(&path).unwrap().map.default_side, 1);
    }
}

//! maptile CLI - Command-line interface
//!
//! Builds satellite map composites and manages the tile cache and
//! configuration.

mod commands;
mod error;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use maptile::config::{config_file_path, ConfigFile};
use maptile::logging::{init_logging, LoggingGuard};

use commands::cache::CacheAction;
use commands::config::ConfigCommands;
use commands::map::MapArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "maptile", version)]
#[command(about = "Stitch satellite map tiles into a single image", long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.maptile/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download a grid of tiles around a position and merge it into a JPEG
    Map(MapArgs),
    /// List available providers
    Providers,
    /// Inspect or clear the disk cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.unwrap_or_else(config_file_path);

    match cli.command {
        Commands::Config { command } => commands::config::run(command, &config_path),
        Commands::Map(args) => {
            let session = Session::start(&config_path)?;
            session
                .runtime
                .block_on(commands::map::run(args, &session.config))
        }
        Commands::Providers => {
            let session = Session::start(&config_path)?;
            session
                .runtime
                .block_on(commands::providers::run(&session.config))
        }
        Commands::Cache { action } => {
            let session = Session::start(&config_path)?;
            session
                .runtime
                .block_on(commands::cache::run(action, &session.config))
        }
    }
}

/// Loaded configuration, logging and runtime for the commands that talk to
/// providers or the cache. Fields drop in order, so the runtime shuts down
/// before the log writer is flushed.
struct Session {
    config: ConfigFile,
    runtime: tokio::runtime::Runtime,
    _logging: LoggingGuard,
}

impl Session {
    fn start(config_path: &Path) -> Result<Self, CliError> {
        let config = ConfigFile::load_from(config_path)?;
        let logging =
            init_logging(&config.logging).map_err(|e| CliError::LoggingInit(e.to_string()))?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(CliError::Runtime)?;

        Ok(Self {
            config,
            runtime,
            _logging: logging,
        })
    }
}

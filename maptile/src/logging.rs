//! Logging setup.
//!
//! Console output always goes to stdout. When enabled in `[logging]`, a
//! second layer writes plain-text records to a log file through a
//! non-blocking writer. The filter comes from `RUST_LOG` and defaults to
//! `info`.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writer.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
    log_path: Option<PathBuf>,
}

impl LoggingGuard {
    /// Path of the log file, when file logging is on.
    pub fn log_path(&self) -> Option<&PathBuf> {
        self.log_path.as_ref()
    }
}

/// Initialize the global subscriber.
///
/// The log file is truncated at start so each run begins with a clean file.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created, the log file
/// cannot be truncated, or a global subscriber is already installed.
pub fn init_logging(settings: &LoggingSettings) -> Result<LoggingGuard, io::Error> {
    let (file_layer, file_guard, log_path) = if settings.file_enabled {
        let log_path = prepare_log_file(settings)?;
        let appender = tracing_appender::rolling::never(&settings.directory, &settings.file);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false);
        (Some(layer), Some(guard), Some(log_path))
    } else {
        (None, None, None)
    };

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter())
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .map_err(io::Error::other)?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
        log_path,
    })
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Create the log directory and truncate the log file.
fn prepare_log_file(settings: &LoggingSettings) -> io::Result<PathBuf> {
    fs::create_dir_all(&settings.directory)?;
    let path = settings.directory.join(&settings.file);
    fs::write(&path, "")?;
    Ok(path)
}

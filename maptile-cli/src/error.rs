//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use maptile::cache::CacheError;
use maptile::config::ConfigFileError;
use maptile::provider::{ProviderError, RegistryError, SchemaError};
use maptile::service::ServiceError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file could not be read or written
    Config(ConfigFileError),
    /// Async runtime could not be started
    Runtime(std::io::Error),
    /// HTTP client could not be built
    HttpClient(ProviderError),
    /// Provider schema could not be loaded
    Schema(SchemaError),
    /// Tile cache failure
    Cache(CacheError),
    /// Map request failed
    Map(ServiceError),
    /// Failed to write output file
    FileWrite { path: String, error: std::io::Error },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Map(ServiceError::Provider(RegistryError::NotFound(_))) => {
                eprintln!();
                eprintln!("Run 'maptile providers' to list available providers.");
            }
            CliError::Config(ConfigFileError::InvalidValue { .. }) => {
                eprintln!();
                eprintln!("Run 'maptile config path' to locate the configuration file.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start runtime: {}", e),
            CliError::HttpClient(e) => write!(f, "Failed to create HTTP client: {}", e),
            CliError::Schema(e) => write!(f, "Failed to load provider schema: {}", e),
            CliError::Cache(e) => write!(f, "Cache error: {}", e),
            CliError::Map(e) => write!(f, "Failed to build map: {}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::HttpClient(e) => Some(e),
            CliError::Schema(e) => Some(e),
            CliError::Cache(e) => Some(e),
            CliError::Map(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            CliError::LoggingInit(_) => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<ProviderError> for CliError {
    fn from(e: ProviderError) -> Self {
        CliError::HttpClient(e)
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        CliError::Schema(e)
    }
}

impl From<CacheError> for CliError {
    fn from(e: CacheError) -> Self {
        CliError::Cache(e)
    }
}

impl From<ServiceError> for CliError {
    fn from(e: ServiceError) -> Self {
        CliError::Map(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maptile::provider::RegistryError;

    #[test]
    fn test_display_wraps_service_error() {
        let err: CliError = ServiceError::Provider(RegistryError::NotFound("bing".into())).into();
        assert_eq!(err.to_string(), "Failed to build map: Provider bing not found");
    }

    #[test]
    fn test_file_write_source() {
        let err = CliError::FileWrite {
            path: "out.jpeg".to_string(),
            error: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.to_string(), "Failed to write file 'out.jpeg': denied");
    }
}

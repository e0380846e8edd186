//! Provider registry.
//!
//! Built once at startup (from the hard-coded vendors, a schema document, or
//! both) and then shared read-only behind an `Arc`.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::http::HttpClient;
use super::schema::{load_schema, SchemaError, SchemaProvider};
use super::{ArcGisProvider, GoogleProvider, OpenStreetMapProvider, TileProvider};

/// Registry lookup and registration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A provider with the same id is already registered
    #[error("Provider {name} ({id}) already registered")]
    Duplicate { id: String, name: String },

    /// No provider with the given id
    #[error("Provider {0} not found")]
    NotFound(String),

    /// The id is empty or contains a path separator
    #[error("Invalid provider id {id:?}: {reason}")]
    InvalidId { id: String, reason: &'static str },
}

/// Maps provider id → provider.
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn TileProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the hard-coded vendors.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        let builtin: [Arc<dyn TileProvider>; 3] = [
            Arc::new(ArcGisProvider::new()),
            Arc::new(GoogleProvider::new()),
            Arc::new(OpenStreetMapProvider::new()),
        ];
        for provider in builtin {
            // Built-in ids are distinct constants.
            let _ = registry.register(provider);
        }
        registry
    }

    /// Build a registry from a schema document (file path or URL).
    ///
    /// Fails on the first entry that cannot be built or registered.
    pub async fn from_schema(source: &str, client: &dyn HttpClient) -> Result<Self, SchemaError> {
        let mut registry = Self::new();
        registry.extend_from_schema(source, client).await?;
        Ok(registry)
    }

    /// Add every provider of a schema document to this registry.
    pub async fn extend_from_schema(
        &mut self,
        source: &str,
        client: &dyn HttpClient,
    ) -> Result<(), SchemaError> {
        for schema in load_schema(source, client).await? {
            let provider = SchemaProvider::from_schema(&schema)?;
            self.register(Arc::new(provider))
                .map_err(|e| SchemaError::Register {
                    name: schema.name.clone(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Register a provider under its id.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidId`] for an empty id or one containing a
    /// path separator; [`RegistryError::Duplicate`] if the id is taken, in
    /// which case the existing provider is kept.
    pub fn register(&mut self, provider: Arc<dyn TileProvider>) -> Result<(), RegistryError> {
        let id = provider.id().to_string();
        validate_id(&id)?;
        if self.providers.contains_key(&id) {
            return Err(RegistryError::Duplicate {
                id,
                name: provider.name().to_string(),
            });
        }
        debug!(id = %id, name = provider.name(), "Registered provider");
        self.providers.insert(id, provider);
        Ok(())
    }

    /// Look up a provider by id.
    pub fn get(&self, id: &str) -> Result<Arc<dyn TileProvider>, RegistryError> {
        self.providers
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    /// All registered ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.providers.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// True when no provider is registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Ids name cache directories, so they must be non-empty and free of path
/// separators.
fn validate_id(id: &str) -> Result<(), RegistryError> {
    let reason = if id.is_empty() {
        "must not be empty"
    } else if id.contains(['/', '\\']) {
        "must not contain a path separator"
    } else if id.chars().any(char::is_control) {
        "must not contain control characters"
    } else {
        return Ok(());
    };
    Err(RegistryError::InvalidId {
        id: id.to_string(),
        reason,
    })
}

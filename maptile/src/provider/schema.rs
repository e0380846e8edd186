//! JSON-defined providers.
//!
//! A schema document is an array of vendor descriptions:
//!
//! ```json
//! [{
//!   "name": "Example Imagery",
//!   "id": "example",
//!   "max_jobs": 4,
//!   "max_zoom": 18,
//!   "proj": "spherical",
//!   "request": {
//!     "url": "https://tiles.example.com/{z}/{x}/{y}.jpg",
//!     "headers": [{ "key": "Referer", "value": "https://example.com" }]
//!   }
//! }]
//! ```
//!
//! The document can live on disk or behind an `http://`/`https://` URL.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use super::http::HttpClient;
use super::registry::RegistryError;
use super::types::{FetchRequest, ProviderError, TileProvider};
use crate::coord::Ellipsoid;
use crate::tile::Tile;

/// Errors raised while loading a provider schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Local schema file could not be read
    #[error("Failed to read schema file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Remote schema could not be fetched
    #[error("Failed to fetch schema from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: ProviderError,
    },

    /// Remote schema answered with a non-200 status
    #[error("Failed to fetch schema from {url}: received status code {status}")]
    Status { url: String, status: u16 },

    /// Document is not a valid schema array
    #[error("Failed to parse schema: {0}")]
    Parse(#[from] serde_json::Error),

    /// An entry could not be turned into a provider
    #[error("Failed to create provider: {0}")]
    Provider(#[from] ProviderError),

    /// An entry clashed with an already registered provider
    #[error("Failed to register provider {name}: {source}")]
    Register {
        name: String,
        #[source]
        source: RegistryError,
    },
}

/// One vendor entry of a schema document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProviderSchema {
    pub name: String,
    pub id: String,
    pub max_jobs: usize,
    pub max_zoom: u8,
    #[serde(rename = "proj")]
    pub projection: String,
    pub request: RequestSchema,
}

/// Request template of a schema entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequestSchema {
    /// URL with `{x}`, `{y}` and `{z}` placeholders.
    pub url: String,
    #[serde(default)]
    pub headers: Vec<HeaderSchema>,
}

/// Static header of a schema entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HeaderSchema {
    pub key: String,
    pub value: String,
}

/// Returns true when the source should be fetched over HTTP.
fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Parse a schema document.
pub fn parse_schema(json: &[u8]) -> Result<Vec<ProviderSchema>, SchemaError> {
    Ok(serde_json::from_slice(json)?)
}

/// Load a schema document from a file path or an HTTP(S) URL.
pub async fn load_schema(
    source: &str,
    client: &dyn HttpClient,
) -> Result<Vec<ProviderSchema>, SchemaError> {
    let body = if is_remote(source) {
        debug!(url = %source, "Fetching provider schema");
        let response = client
            .send(&FetchRequest::new(source))
            .await
            .map_err(|source_err| SchemaError::Fetch {
                url: source.to_string(),
                source: source_err,
            })?;
        if !response.is_ok() {
            return Err(SchemaError::Status {
                url: source.to_string(),
                status: response.status,
            });
        }
        response.body.to_vec()
    } else {
        debug!(path = %source, "Reading provider schema");
        let path = Path::new(source);
        tokio::fs::read(path).await.map_err(|e| SchemaError::Read {
            path: source.to_string(),
            source: e,
        })?
    };

    let schemas = parse_schema(&body)?;
    info!(source = %source, providers = schemas.len(), "Loaded provider schema");
    Ok(schemas)
}

/// Provider built from a schema entry.
#[derive(Debug, Clone)]
pub struct SchemaProvider {
    id: String,
    name: String,
    url: String,
    headers: Vec<(String, String)>,
    max_jobs: usize,
    max_zoom: u8,
    ellipsoid: Ellipsoid,
}

impl SchemaProvider {
    /// Build a provider from one schema entry.
    ///
    /// Header names are matched case-insensitively; a later entry for the same
    /// name replaces the earlier value.
    ///
    /// # Errors
    ///
    /// [`ProviderError::UnknownProjection`] when `proj` is neither `wgs84`
    /// nor `spherical`.
    pub fn from_schema(schema: &ProviderSchema) -> Result<Self, ProviderError> {
        let ellipsoid = Ellipsoid::from_name(&schema.projection).ok_or_else(|| {
            ProviderError::UnknownProjection {
                projection: schema.projection.clone(),
                provider: schema.name.clone(),
            }
        })?;

        let mut headers: Vec<(String, String)> = Vec::with_capacity(schema.request.headers.len());
        for header in &schema.request.headers {
            match headers
                .iter_mut()
                .find(|(name, _)| name.eq_ignore_ascii_case(&header.key))
            {
                Some(existing) => existing.1 = header.value.clone(),
                None => headers.push((header.key.clone(), header.value.clone())),
            }
        }

        Ok(Self {
            id: schema.id.clone(),
            name: schema.name.clone(),
            url: schema.request.url.clone(),
            headers,
            max_jobs: schema.max_jobs,
            max_zoom: schema.max_zoom,
            ellipsoid,
        })
    }

    fn build_url(&self, tile: &Tile) -> String {
        self.url
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
            .replace("{z}", &tile.z.to_string())
    }
}

impl TileProvider for SchemaProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn max_concurrency(&self) -> usize {
        self.max_jobs
    }

    fn max_zoom(&self) -> u8 {
        self.max_zoom
    }

    fn ellipsoid(&self) -> Ellipsoid {
        self.ellipsoid
    }

    fn fetch_request(&self, tile: &Tile) -> FetchRequest {
        FetchRequest {
            url: self.build_url(tile),
            headers: self.headers.clone(),
        }
    }
}

//! Tile provider abstraction
//!
//! A provider describes where an imagery vendor keeps its tiles: how to
//! project coordinates onto its grid, how to build the request for one tile,
//! and how many downloads it tolerates at once. Providers never perform I/O;
//! requests go out through an [`HttpClient`].
//!
//! # Registry
//!
//! ```ignore
//! use maptile::provider::{ProviderRegistry, ReqwestClient};
//!
//! let client = ReqwestClient::new()?;
//! let mut registry = ProviderRegistry::with_builtin();
//! registry.extend_from_schema("providers.json", &client).await?;
//! let provider = registry.get("arcgis")?;
//! ```

mod arcgis;
mod google;
mod http;
mod openstreetmap;
mod registry;
mod schema;
mod types;

pub use arcgis::ArcGisProvider;
pub use google::GoogleProvider;
pub use http::{HttpClient, HttpResponse, ReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use openstreetmap::OpenStreetMapProvider;
pub use registry::{ProviderRegistry, RegistryError};
pub use schema::{
    load_schema, parse_schema, HeaderSchema, ProviderSchema, RequestSchema, SchemaError,
    SchemaProvider,
};
pub use types::{FetchRequest, ProviderError, TileProvider};

#[cfg(test)]
pub use http::tests::MockHttpClient;

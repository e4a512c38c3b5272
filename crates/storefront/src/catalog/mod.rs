//! Remote plant catalog API client.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest`; every call is a single GET, no retry, no cache
//! - Responses are JSON envelopes (`{"plants": [...]}`, `{"plant": {...}}`)
//!   parsed leniently into `sapling_core` records
//! - The [`Catalog`] trait is the seam between the interaction controller and
//!   the network, so the controller can be driven by in-memory fakes
//!
//! # Failure policy
//!
//! Transport errors, non-2xx statuses, unparseable bodies and missing envelope
//! fields are all the same kind of failure. They are logged at `error` level
//! (which reaches Sentry when configured) at the point of the call and never
//! bubble up as exceptions:
//!
//! - plant lists come back as `Err(CatalogError)` so the grid can say
//!   "couldn't load" instead of "no trees"; callers that do not care use
//!   `unwrap_or_default()` and get an empty list
//! - categories collapse to an empty list
//! - a plant detail collapses to `None` (the modal simply does not open)
//!
//! # Example
//!
//! ```rust,ignore
//! use sapling_storefront::catalog::{Catalog, CatalogClient};
//!
//! let client = CatalogClient::new(&config.catalog);
//!
//! let plants = client.fetch_all_plants().await.unwrap_or_default();
//! let detail = client.fetch_plant_detail(PlantId::new(1)).await;
//! ```

mod client;
pub mod envelope;

use std::future::Future;

use sapling_core::{CategoryId, CategoryRecord, PlantId, PlantRecord};
use thiserror::Error;

pub use client::CatalogClient;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connection, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Unexpected status {status} from {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// Body was not JSON, or a record could not be decoded.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The envelope lacks the field that carries the data.
    #[error("Response is missing the `{0}` field")]
    MissingField(&'static str),
}

/// Read access to the plant catalog.
///
/// Implementations must follow the failure policy described in the module
/// docs: log, then degrade to an empty/absent result.
pub trait Catalog: Send + Sync {
    /// All categories, in API order. Empty on failure.
    fn fetch_categories(&self) -> impl Future<Output = Vec<CategoryRecord>> + Send;

    /// Every plant in the catalog.
    fn fetch_all_plants(
        &self,
    ) -> impl Future<Output = Result<Vec<PlantRecord>, CatalogError>> + Send;

    /// Plants in one category.
    fn fetch_plants_by_category(
        &self,
        category: &CategoryId,
    ) -> impl Future<Output = Result<Vec<PlantRecord>, CatalogError>> + Send;

    /// A single plant, or `None` when it cannot be loaded or the response
    /// carries neither a `plant` nor a `plants` field.
    fn fetch_plant_detail(&self, id: PlantId) -> impl Future<Output = Option<PlantRecord>> + Send;
}

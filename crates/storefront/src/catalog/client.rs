//! Catalog API client implementation.
//!
//! Uses `reqwest` for HTTP. Nothing is cached: every navigation fetches fresh
//! data and replaces whatever was shown before.

use std::sync::Arc;

use sapling_core::{CategoryId, CategoryRecord, PlantId, PlantRecord};
use serde_json::Value;
use tracing::{debug, instrument};

use super::{Catalog, CatalogError, envelope};
use crate::config::CatalogConfig;

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the remote plant catalog API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    api_base: String,
}

impl CatalogClient {
    /// Create a new catalog API client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        Self::with_http_client(config, reqwest::Client::new())
    }

    /// Create a client around an existing `reqwest::Client`.
    #[must_use]
    pub fn with_http_client(config: &CatalogConfig, client: reqwest::Client) -> Self {
        Self {
            inner: Arc::new(CatalogClientInner {
                client,
                api_base: config.api_base.as_str().trim_end_matches('/').to_string(),
            }),
        }
    }

    /// Build an endpoint URL from path segments, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> String {
        let mut url = self.inner.api_base.clone();
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    /// GET a URL and decode the body as JSON.
    async fn get_json(&self, url: &str) -> Result<Value, CatalogError> {
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        // Failures are reported once, at `error`, by the `Catalog` impl.
        if !status.is_success() {
            debug!(
                status = %status,
                body = %body.chars().take(200).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            debug!(
                error = %e,
                body = %body.chars().take(200).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }

    // =========================================================================
    // Raw fetches (errors returned, not logged)
    // =========================================================================

    /// Fetch the category list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope is missing.
    pub async fn try_fetch_categories(&self) -> Result<Vec<CategoryRecord>, CatalogError> {
        let body = self.get_json(&self.endpoint(&["categories"])).await?;
        envelope::category_list(&body)
    }

    /// Fetch every plant.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope is missing.
    pub async fn try_fetch_all_plants(&self) -> Result<Vec<PlantRecord>, CatalogError> {
        let body = self.get_json(&self.endpoint(&["plants"])).await?;
        envelope::plant_list(&body)
    }

    /// Fetch the plants of one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope is missing.
    pub async fn try_fetch_plants_by_category(
        &self,
        category: &CategoryId,
    ) -> Result<Vec<PlantRecord>, CatalogError> {
        let body = self
            .get_json(&self.endpoint(&["category", &category.to_string()]))
            .await?;
        envelope::plant_list(&body)
    }

    /// Fetch a single plant.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the record cannot be decoded.
    pub async fn try_fetch_plant_detail(
        &self,
        id: PlantId,
    ) -> Result<Option<PlantRecord>, CatalogError> {
        let body = self
            .get_json(&self.endpoint(&["plant", &id.to_string()]))
            .await?;
        envelope::plant_detail(&body)
    }
}

impl Catalog for CatalogClient {
    #[instrument(skip(self))]
    async fn fetch_categories(&self) -> Vec<CategoryRecord> {
        match self.try_fetch_categories().await {
            Ok(categories) => {
                debug!(count = categories.len(), "Loaded categories");
                categories
            }
            Err(e) => {
                tracing::error!(error = %e, "Categories load error");
                Vec::new()
            }
        }
    }

    #[instrument(skip(self))]
    async fn fetch_all_plants(&self) -> Result<Vec<PlantRecord>, CatalogError> {
        let result = self.try_fetch_all_plants().await;
        match &result {
            Ok(plants) => debug!(count = plants.len(), "Loaded all plants"),
            Err(e) => tracing::error!(error = %e, "All plants load error"),
        }
        result
    }

    #[instrument(skip(self), fields(category = %category))]
    async fn fetch_plants_by_category(
        &self,
        category: &CategoryId,
    ) -> Result<Vec<PlantRecord>, CatalogError> {
        let result = self.try_fetch_plants_by_category(category).await;
        match &result {
            Ok(plants) => debug!(count = plants.len(), "Loaded plants by category"),
            Err(e) => tracing::error!(error = %e, "Plants by category error"),
        }
        result
    }

    #[instrument(skip(self), fields(plant_id = %id))]
    async fn fetch_plant_detail(&self, id: PlantId) -> Option<PlantRecord> {
        match self.try_fetch_plant_detail(id).await {
            Ok(Some(plant)) => Some(plant),
            Ok(None) => {
                debug!("Plant detail response carried no plant");
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "Plant details error");
                None
            }
        }
    }
}

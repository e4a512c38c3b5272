//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::CatalogClient;
use crate::config::StorefrontConfig;
use crate::middleware::{MAX_SESSIONS, session_idle};
use crate::visitors::VisitorStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the catalog client, the visitor store and
/// configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    visitors: VisitorStore,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let catalog = CatalogClient::new(&config.catalog);
        Self::with_catalog(config, catalog)
    }

    /// Create application state around an existing catalog client.
    #[must_use]
    pub fn with_catalog(config: StorefrontConfig, catalog: CatalogClient) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                visitors: VisitorStore::new(MAX_SESSIONS, session_idle()),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the per-visitor carts and load sequences.
    #[must_use]
    pub fn visitors(&self) -> &VisitorStore {
        &self.inner.visitors
    }
}

//! Integration tests for the Sapling storefront.
//!
//! [`TestContext`] starts a fixture catalog API and a real storefront server,
//! each on an ephemeral port, and hands out a cookie-aware HTTP client so
//! the session cart survives between requests.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p sapling-integration-tests
//! ```

pub mod fixture;

use std::net::SocketAddr;

use reqwest::{Client, Response};
use sapling_storefront::{app, config::StorefrontConfig, state::AppState};
use tokio::net::TcpListener;

/// Running storefront plus the catalog it talks to.
pub struct TestContext {
    pub client: Client,
    pub storefront_url: String,
    pub catalog_url: String,
}

impl TestContext {
    /// Start the fixture catalog and a storefront pointed at it.
    ///
    /// # Panics
    ///
    /// Panics if a listener cannot be bound or the client cannot be built.
    pub async fn new() -> Self {
        let catalog_addr = serve(fixture::router()).await;
        let catalog_url = format!("http://{catalog_addr}/api");
        Self::with_catalog_url(catalog_url).await
    }

    /// Start a storefront whose catalog API refuses connections.
    ///
    /// # Panics
    ///
    /// Panics if a listener cannot be bound or the client cannot be built.
    pub async fn with_catalog_down() -> Self {
        // Bind and drop a listener to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind placeholder listener");
        let addr = listener.local_addr().expect("Placeholder listener has no address");
        drop(listener);

        Self::with_catalog_url(format!("http://{addr}/api")).await
    }

    async fn with_catalog_url(catalog_url: String) -> Self {
        let lookup_url = catalog_url.clone();
        let config = StorefrontConfig::from_lookup(|key| match key {
            "CATALOG_API_BASE" => Some(lookup_url.clone()),
            "STOREFRONT_PORT" => Some("0".to_string()),
            _ => None,
        })
        .expect("Invalid test configuration");

        let storefront_addr = serve(app(AppState::new(config))).await;

        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            storefront_url: format!("http://{storefront_addr}"),
            catalog_url,
        }
    }

    /// GET a storefront path.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{path}", self.storefront_url))
            .send()
            .await
            .expect("GET request failed")
    }

    /// POST a form to a storefront path.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(format!("{}{path}", self.storefront_url))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }
}

/// Serve a router on an ephemeral local port.
async fn serve(router: axum::Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Test listener has no address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server error");
    });

    addr
}

//! HTTP route handlers for storefront.
//!
//! Each handler decodes the request into a controller [`Action`], dispatches
//! it and renders the returned region updates. The first update is the
//! response body (swapped into the `hx-target`); the rest ride along as
//! out-of-band swaps.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                  - Full page (initial load)
//! GET  /health            - Health check
//!
//! # Catalog (HTMX fragments)
//! GET  /categories        - Grid for every plant
//! GET  /categories/{id}   - Grid for one category (204 when superseded)
//! GET  /plants/{id}       - Detail modal (hidden when the plant is unavailable)
//! GET  /modal/close       - Hidden modal
//!
//! # Cart (HTMX fragments)
//! POST /cart/add          - Add one unit; from the modal, also closes it
//! POST /cart/remove       - Drop a line
//! ```
//!
//! [`Action`]: crate::controller::Action

pub mod cart;
pub mod catalog;
pub mod home;

use std::sync::Arc;

use askama::Template;
use axum::{
    Router,
    http::{StatusCode, Uri},
    response::{AppendHeaders, Html, IntoResponse, Response},
    routing::{get, post},
};
use tower_sessions::Session;

use crate::controller::Update;
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::views::CATEGORIES_PATH;
use crate::views::templates::{
    CartPanelTemplate, CategoryNavTemplate, ModalTemplate, ProductGridTemplate,
};
use crate::visitors::{Visitor, VisitorId};

/// Session keys.
pub mod session_keys {
    /// Id of the visitor whose cart this session sees.
    pub const VISITOR: &str = "visitor";
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route(CATEGORIES_PATH, get(catalog::all_plants))
        .route("/categories/{id}", get(catalog::category))
        .route("/plants/{id}", get(catalog::plant_detail))
        .route("/modal/close", get(catalog::close_modal))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health))
        .merge(catalog_routes())
        .nest("/cart", cart_routes())
        .fallback(not_found)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the catalog API.
async fn health() -> &'static str {
    "ok"
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

// =============================================================================
// Rendering
// =============================================================================

/// Render one region update as an HTML fragment.
fn fragment(update: &Update, oob: bool) -> std::result::Result<String, askama::Error> {
    match update {
        Update::Categories(categories) => CategoryNavTemplate { categories, oob }.render(),
        Update::Grid(grid) => ProductGridTemplate { grid, oob }.render(),
        Update::Cart(cart) => CartPanelTemplate { cart, oob }.render(),
        Update::Modal(modal) => ModalTemplate {
            modal: modal.as_ref(),
            oob,
        }
        .render(),
    }
}

/// Turn controller updates into an HTMX response.
///
/// No updates (a superseded category load) yields `204` with
/// `HX-Reswap: none`, so the page keeps whatever the newer request renders.
///
/// # Errors
///
/// Returns `AppError::Render` if a template fails to render.
pub fn render_updates(updates: &[Update]) -> Result<Response> {
    let Some((primary, rest)) = updates.split_first() else {
        return Ok((StatusCode::NO_CONTENT, AppendHeaders([("HX-Reswap", "none")])).into_response());
    };

    let mut html = fragment(primary, false)?;
    for update in rest {
        html.push_str(&fragment(update, true)?);
    }

    Ok(Html(html).into_response())
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Look up the visitor behind this session, starting one if needed.
///
/// The id is written to the session once; the first response then sets the
/// cookie. An unreadable session record is treated as a new visitor.
async fn visitor(state: &AppState, session: &Session) -> Result<Arc<Visitor>> {
    let stored = match session.get::<VisitorId>(session_keys::VISITOR).await {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read visitor from session, starting fresh");
            None
        }
    };

    let id = match stored {
        Some(id) => id,
        None => {
            let id = VisitorId::new_v4();
            session.insert(session_keys::VISITOR, id).await?;
            tracing::debug!(visitor = %id, "New visitor");
            id
        }
    };

    Ok(state.visitors().visitor(id).await)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sapling_core::{Cart, PlantId, Price};

    use super::*;
    use crate::views::{render_cart_panel, render_product_grid};

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_no_updates_means_no_swap() {
        let response = render_updates(&[]).unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers().get("HX-Reswap").unwrap(), "none");
    }

    #[tokio::test]
    async fn test_first_update_is_primary_rest_out_of_band() {
        let mut cart = Cart::new();
        cart.add_item(PlantId::new(1), "Mango", Price::from_units(500));

        let response = render_updates(&[
            Update::Cart(render_cart_panel(&cart)),
            Update::Modal(None),
        ])
        .unwrap();
        let html = body_text(response).await;

        let (primary, oob) = html.split_once("id=\"plant-modal\"").unwrap();
        assert!(primary.contains("id=\"cart-panel\""));
        assert!(!primary.contains("hx-swap-oob"));
        assert!(oob.contains("hx-swap-oob=\"true\""));
    }

    #[tokio::test]
    async fn test_single_grid_update() {
        let response = render_updates(&[Update::Grid(render_product_grid(&[]))]).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("No trees found."));
    }
}

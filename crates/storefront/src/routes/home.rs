//! Home page route handler.

use axum::extract::State;
use sapling_core::Cart;
use tower_sessions::Session;
use tracing::instrument;

use super::visitor;
use crate::controller::{Controller, Update};
use crate::error::Result;
use crate::state::AppState;
use crate::views::templates::IndexTemplate;
use crate::views::{ALL_PLANTS_FAILED_MESSAGE, GridView, render_cart_panel};

/// Display the storefront page.
///
/// Runs the initial load (categories, then every plant) and renders the
/// visitor's cart. The page gets its own load sequence: a full render has
/// no older grid to protect.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<IndexTemplate> {
    let cart = visitor(&state, &session).await?.cart().lock().await.clone();
    let mut controller = Controller::new(state.catalog(), cart);

    let mut page = IndexTemplate {
        categories: Vec::new(),
        grid: GridView::unavailable(ALL_PLANTS_FAILED_MESSAGE),
        cart: render_cart_panel(&Cart::new()),
    };

    for update in controller.initialize().await {
        match update {
            Update::Categories(categories) => page.categories = categories,
            Update::Grid(grid) => page.grid = grid,
            Update::Cart(cart) => page.cart = cart,
            Update::Modal(_) => {}
        }
    }

    Ok(page)
}

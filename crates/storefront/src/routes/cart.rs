//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart is kept per visitor; each handler holds the visitor's cart lock
//! from read to write-back, so concurrent requests never lose an update.

use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use sapling_core::{DEFAULT_LABEL, PlantId, Price};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::{render_updates, visitor};
use crate::controller::{Action, AddSource, CartRequest, Controller};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Event fired when adding from the modal closes it.
pub const MODAL_CLOSED_EVENT: &str = "modal-closed";

/// Add to cart form data, as carried by the add-to-cart controls.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub source: AddSource,
}

impl AddToCartForm {
    /// Decode the form into an action.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if the id or price is not numeric.
    pub fn into_action(self) -> Result<Action> {
        let id = self
            .id
            .parse::<PlantId>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        let price = Price::parse(&self.price)
            .ok_or_else(|| AppError::BadRequest(format!("invalid price {:?}", self.price)))?;
        let name = match self.name.trim() {
            "" => DEFAULT_LABEL.to_string(),
            name => name.to_string(),
        };

        Ok(Action::AddToCart {
            item: CartRequest { id, name, price },
            source: self.source,
        })
    }
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: String,
}

/// Add one unit of a plant to the cart (HTMX).
///
/// Returns the cart panel. Adding from the modal also returns the hidden
/// modal out-of-band and fires `modal-closed`.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let action = form.into_action()?;
    let closes_modal = matches!(
        action,
        Action::AddToCart {
            source: AddSource::Modal,
            ..
        }
    );
    if let Action::AddToCart { item, .. } = &action {
        let plant_id = item.id.to_string();
        add_breadcrumb("cart", "Added to cart", Some(&[("plant_id", plant_id.as_str())]));
    }

    let visitor = visitor(&state, &session).await?;
    let mut cart = visitor.cart().lock().await;
    let mut controller = Controller::new(state.catalog(), cart.clone());
    let updates = controller.dispatch(action).await;
    *cart = controller.into_cart();
    drop(cart);

    let response = render_updates(&updates)?;
    if closes_modal {
        return Ok((AppendHeaders([("HX-Trigger", MODAL_CLOSED_EVENT)]), response).into_response());
    }
    Ok(response)
}

/// Remove a plant's line from the cart (HTMX).
///
/// Removing a plant that is not in the cart is a no-op.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let id = form
        .id
        .parse::<PlantId>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let plant_id = id.to_string();
    add_breadcrumb("cart", "Removed from cart", Some(&[("plant_id", plant_id.as_str())]));

    let visitor = visitor(&state, &session).await?;
    let mut cart = visitor.cart().lock().await;
    let mut controller = Controller::new(state.catalog(), cart.clone());
    let updates = controller.dispatch(Action::RemoveFromCart(id)).await;
    *cart = controller.into_cart();
    drop(cart);

    render_updates(&updates)
}

//! Catalog route handlers: category grids and the detail modal.
//!
//! None of these touch the cart, so the controller runs with an empty one.

use axum::{
    extract::{Path, State},
    response::Response,
};
use sapling_core::{Cart, CategoryFilter, CategoryId, PlantId};
use tower_sessions::Session;
use tracing::instrument;

use super::{render_updates, visitor};
use crate::controller::{Action, Controller};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Grid fragment for every plant.
#[instrument(skip(state, session))]
pub async fn all_plants(State(state): State<AppState>, session: Session) -> Result<Response> {
    select(&state, &session, CategoryFilter::All).await
}

/// Grid fragment for one category.
#[instrument(skip(state, session))]
pub async fn category(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = id
        .parse::<CategoryId>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    select(&state, &session, CategoryFilter::Category(id)).await
}

/// Load a grid on the visitor's load sequence.
///
/// When the visitor picks another category before this load finishes, the
/// result is stale and the response is `204` with `HX-Reswap: none`.
async fn select(state: &AppState, session: &Session, filter: CategoryFilter) -> Result<Response> {
    let loads = visitor(state, session).await?.loads();

    let mut controller =
        Controller::new(state.catalog(), Cart::new()).with_load_sequence(loads);
    let updates = controller.dispatch(Action::SelectCategory(filter)).await;
    render_updates(&updates)
}

/// Detail modal fragment for a plant.
///
/// When the plant cannot be loaded the modal comes back hidden.
#[instrument(skip(state))]
pub async fn plant_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = id
        .parse::<PlantId>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let mut controller = Controller::new(state.catalog(), Cart::new());
    let updates = controller.dispatch(Action::OpenDetail(id)).await;
    render_updates(&updates)
}

/// Hidden modal fragment.
#[instrument(skip(state))]
pub async fn close_modal(State(state): State<AppState>) -> Result<Response> {
    let mut controller = Controller::new(state.catalog(), Cart::new());
    let updates = controller.dispatch(Action::CloseModal).await;
    render_updates(&updates)
}

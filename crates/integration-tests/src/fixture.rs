//! Fixture catalog API.
//!
//! Mirrors the envelopes of the real plant API, including its quirks: ids
//! and prices as strings, a detail endpoint that answers with `plants`
//! instead of `plant`, and categories that fail or come back empty.

use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};

/// Category whose plant list is empty.
pub const EMPTY_CATEGORY: &str = "2";

/// Category whose plant list fails with a server error.
pub const FAILING_CATEGORY: &str = "3";

/// Plants served by `/api/plants`, in order.
#[must_use]
pub fn plants() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "name": "Mango Tree",
            "description": "A fast-growing tropical tree that produces delicious, juicy mangoes during summer. Its dense green canopy offers shade.",
            "image": "https://img.example/mango.jpg",
            "category": "Fruit Tree",
            "price": 500
        }),
        json!({
            "id": "2",
            "name": "Neem Tree",
            "category": "Medicinal Tree",
            "price": "300"
        }),
        json!({
            "id": 3,
            "name": "Banyan <Tree>",
            "category": "Shade Tree",
            "price": 0
        }),
    ]
}

fn plant(id: &str) -> Option<Value> {
    plants()
        .into_iter()
        .find(|plant| plant["id"].to_string().trim_matches('"') == id)
}

/// Router exposing the catalog endpoints under `/api`.
pub fn router() -> Router {
    Router::new()
        .route("/api/categories", get(categories))
        .route("/api/plants", get(|| async { Json(json!({ "status": true, "plants": plants() })) }))
        .route("/api/category/{id}", get(category))
        .route("/api/plant/{id}", get(plant_detail))
}

async fn categories() -> Json<Value> {
    Json(json!({
        "status": true,
        "categories": [
            { "id": 1, "category_name": "Fruit Tree" },
            { "id": 2, "category_name": "Flowering Tree" },
            { "id": 3, "category_name": "Shade Tree" }
        ]
    }))
}

async fn category(Path(id): Path<String>) -> Response {
    match id.as_str() {
        "1" => Json(json!({ "status": true, "plants": [plants().swap_remove(0)] })).into_response(),
        EMPTY_CATEGORY => Json(json!({ "status": true, "plants": [] })).into_response(),
        FAILING_CATEGORY => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        _ => Json(json!({ "status": false })).into_response(),
    }
}

async fn plant_detail(Path(id): Path<String>) -> Json<Value> {
    // The real API answers with the plural field name.
    Json(plant(&id).map_or_else(
        || json!({ "status": false }),
        |plant| json!({ "status": true, "plants": plant }),
    ))
}

//! Decoding of catalog API response envelopes.
//!
//! The API wraps every payload in an object (`{"status": true, "plants": [...]}`)
//! and is not consistent about field names, so decoding goes through
//! `serde_json::Value` rather than fixed structs.

use sapling_core::{CategoryRecord, PlantRecord};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::CatalogError;

/// Envelope field carrying a plant list.
pub const PLANTS_FIELD: &str = "plants";
/// Envelope field carrying a single plant.
pub const PLANT_FIELD: &str = "plant";
/// Envelope field carrying the category list.
pub const CATEGORIES_FIELD: &str = "categories";

/// Decode a plant list envelope.
///
/// A missing or `null` `plants` field is a failure. A `plants` field that is
/// not an array is malformed and decodes to an empty list. Individual entries
/// that cannot be decoded are skipped.
///
/// # Errors
///
/// Returns [`CatalogError::MissingField`] when the envelope has no plant list.
pub fn plant_list(body: &Value) -> Result<Vec<PlantRecord>, CatalogError> {
    records(body, PLANTS_FIELD)
}

/// Decode the category list envelope.
///
/// Same rules as [`plant_list`], for the `categories` field.
///
/// # Errors
///
/// Returns [`CatalogError::MissingField`] when the envelope has no category list.
pub fn category_list(body: &Value) -> Result<Vec<CategoryRecord>, CatalogError> {
    records(body, CATEGORIES_FIELD)
}

/// Decode a plant detail envelope.
///
/// The record is read from `plant`, falling back to `plants`. If `plants`
/// holds an array its first entry is used. `Ok(None)` means neither field
/// carries anything.
///
/// # Errors
///
/// Returns [`CatalogError::Parse`] when a record is present but cannot be
/// decoded (e.g. it has no id).
pub fn plant_detail(body: &Value) -> Result<Option<PlantRecord>, CatalogError> {
    let candidate = present(body, PLANT_FIELD).or_else(|| present(body, PLANTS_FIELD));

    let record = match candidate {
        Some(Value::Array(entries)) => entries.first(),
        Some(Value::Object(_)) => candidate,
        Some(other) => {
            tracing::warn!(value = %other, "Plant detail envelope holds a non-object");
            None
        }
        None => None,
    };

    record
        .map(|value| PlantRecord::deserialize(value).map_err(CatalogError::from))
        .transpose()
}

fn records<T: DeserializeOwned>(body: &Value, field: &'static str) -> Result<Vec<T>, CatalogError> {
    let Some(list) = present(body, field) else {
        return Err(CatalogError::MissingField(field));
    };

    let Some(entries) = list.as_array() else {
        tracing::warn!(field, "Envelope field is not a list, treating as empty");
        return Ok(Vec::new());
    };

    Ok(entries
        .iter()
        .filter_map(|entry| match T::deserialize(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(field, error = %e, "Skipping malformed catalog record");
                None
            }
        })
        .collect())
}

/// A field that exists and is not `null`.
fn present<'a>(body: &'a Value, field: &str) -> Option<&'a Value> {
    body.get(field).filter(|value| !value.is_null())
}

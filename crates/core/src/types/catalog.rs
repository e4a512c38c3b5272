//! Catalog records as served by the remote plant API.
//!
//! Records are read-only snapshots: they are fetched, rendered and thrown
//! away. Deserialization is deliberately forgiving. Optional fields accept
//! `null`, the wrong scalar type, or nothing at all, and only a missing or
//! non-numeric plant id rejects a record.

use serde::{Deserialize, Deserializer, Serialize};

use super::id::{CategoryId, PlantId};
use super::price::Price;

/// Price used when a plant has no price (or a zero price).
pub const FALLBACK_PRICE_UNITS: i64 = 500;

/// Label used when a plant has no name or category.
pub const DEFAULT_LABEL: &str = "Tree";

/// A plant in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantRecord {
    #[serde(deserialize_with = "lenient::plant_id")]
    pub id: PlantId,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::price")]
    pub price: Option<Price>,
}

impl PlantRecord {
    /// Create a record with only an id and name; every other field absent.
    #[must_use]
    pub fn new(id: PlantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
            description: None,
            image: None,
            category: None,
            price: None,
        }
    }

    /// Builder-style price setter.
    #[must_use]
    pub fn with_price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    /// Builder-style category setter.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Builder-style description setter.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder-style image setter.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Name, or [`DEFAULT_LABEL`] when absent.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_LABEL)
    }

    /// Category, or [`DEFAULT_LABEL`] when absent.
    #[must_use]
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(DEFAULT_LABEL)
    }

    /// Price used for display and for the cart.
    ///
    /// A zero price is treated like a missing one.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        self.price
            .filter(|price| !price.is_zero())
            .unwrap_or_else(|| Price::from_units(FALLBACK_PRICE_UNITS))
    }
}

/// A named grouping of plants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: CategoryId,
    #[serde(default, deserialize_with = "lenient::label")]
    pub category_name: String,
}

impl CategoryRecord {
    #[must_use]
    pub fn new(id: impl Into<CategoryId>, category_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category_name: category_name.into(),
        }
    }
}

mod lenient {
    use serde::de::Error as _;
    use serde_json::Value;

    use super::{Deserialize, Deserializer, PlantId, Price};

    #[allow(clippy::cast_possible_truncation)]
    pub fn plant_id<'de, D>(deserializer: D) -> Result<PlantId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match &value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0)
                        .map(|f| f as i64)
                })
                .and_then(|id| i32::try_from(id).ok())
                .map(PlantId::new)
                .ok_or_else(|| D::Error::custom(format!("plant id out of range: {n}"))),
            Value::String(s) => s.parse().map_err(D::Error::custom),
            other => Err(D::Error::custom(format!("invalid plant id: {other}"))),
        }
    }

    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(s) if !s.trim().is_empty() => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn label<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        text(deserializer).map(Option::unwrap_or_default)
    }

    pub fn price<'de, D>(deserializer: D) -> Result<Option<Price>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Price::coerce(&value))
    }
}

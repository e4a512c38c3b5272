//! Newtype IDs for type-safe catalog references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. Category identifiers
//! are looser: the catalog API hands out both numeric and textual ids, so
//! [`CategoryId`] keeps whichever form it was given.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an identifier from user input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input string is empty (after trimming).
    #[error("id cannot be empty")]
    Empty,
    /// The input is not an integer.
    #[error("id must be an integer, got {0:?}")]
    NotNumeric(String),
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_i32()`
/// - `From<i32>` and `Into<i32>` implementations
/// - `FromStr` that trims whitespace, so ids read back from form fields parse
///
/// # Example
///
/// ```rust
/// # use sapling_core::define_id;
/// define_id!(PlantId);
/// define_id!(OrderId);
///
/// let plant_id = PlantId::new(1);
/// let order_id = OrderId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: PlantId = order_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err($crate::types::id::IdError::Empty);
                }
                trimmed
                    .parse::<i32>()
                    .map(Self)
                    .map_err(|_| $crate::types::id::IdError::NotNumeric(trimmed.to_string()))
            }
        }
    };
}

define_id!(PlantId);

/// Identifier of a catalog category.
///
/// The remote API is not consistent about id types, so both integer and
/// string ids are accepted and rendered back exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryId {
    /// Integer id, e.g. `1`.
    Numeric(i64),
    /// Any other textual id, e.g. `"fruit-trees"`.
    Named(String),
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Named(id) => f.write_str(id),
        }
    }
}

impl FromStr for CategoryId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(IdError::Empty);
        }
        // Only canonical integers are numeric: "01" must reach the API as "01".
        match trimmed.parse::<i64>() {
            Ok(id) if id.to_string() == trimmed => Ok(Self::Numeric(id)),
            _ => Ok(Self::Named(trimmed.to_string())),
        }
    }
}

impl From<i64> for CategoryId {
    fn from(id: i64) -> Self {
        Self::Numeric(id)
    }
}

impl From<i32> for CategoryId {
    fn from(id: i32) -> Self {
        Self::Numeric(i64::from(id))
    }
}

impl From<&str> for CategoryId {
    fn from(id: &str) -> Self {
        Self::Named(id.to_string())
    }
}

/// Which slice of the catalog the product grid shows.
///
/// `All` is a pseudo-category: it is never part of the fetched category list
/// and always sits first in the category navigation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    /// Every plant in the catalog.
    #[default]
    All,
    /// Plants belonging to one category.
    Category(CategoryId),
}

impl CategoryFilter {
    /// Markup key used for the "All" filter.
    pub const ALL_KEY: &'static str = "all";

    /// Key identifying this filter in markup.
    ///
    /// Not parsed back: a category may legitimately be called `all`, so
    /// routes address `All` and single categories by different paths.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::All => Self::ALL_KEY.to_string(),
            Self::Category(id) => id.to_string(),
        }
    }
}

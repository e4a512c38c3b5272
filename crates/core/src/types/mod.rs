//! Core types for Sapling.
//!
//! This module provides type-safe wrappers for catalog and cart concepts.

pub mod cart;
pub mod catalog;
pub mod id;
pub mod price;

pub use cart::{Cart, CartLineItem};
pub use catalog::{CategoryRecord, DEFAULT_LABEL, FALLBACK_PRICE_UNITS, PlantRecord};
pub use id::*;
pub use price::{CURRENCY_SYMBOL, Price, format_money};

//! Sapling Core - Shared domain types.
//!
//! This crate provides the types used by the Sapling plant storefront:
//! - catalog records (`PlantRecord`, `CategoryRecord`) as served by the
//!   remote plant API
//! - the shopping `Cart` and its line items
//! - `Price` and the `format_money` display formatter
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no templates. This keeps it lightweight and fully unit-testable.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, catalog records and the cart store

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

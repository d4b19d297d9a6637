//! Core types for Keystand.
//!
//! This module provides type-safe wrappers for the backend's records.

pub mod id;
pub mod price;
pub mod product;
pub mod settings;

pub use id::{ProductId, ProductIdError};
pub use price::Price;
pub use product::Product;
pub use settings::Settings;

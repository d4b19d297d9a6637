//! Keystand storefront library.
//!
//! Product listing and the barcode payment page, backed by a hosted REST
//! backend. Exposed as a library so the router can be exercised in tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod error;
pub mod payment;
pub mod routes;
pub mod settings;
pub mod state;

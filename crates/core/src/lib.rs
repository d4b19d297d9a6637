//! Keystand Core - Shared types library.
//!
//! This crate provides the domain types used by both Keystand binaries:
//! - `storefront` - Public product listing and barcode payment pages
//! - `admin` - Internal administration panel
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Products and
//! settings are owned by the hosted backend; these types mirror the records
//! it returns.
//!
//! # Modules
//!
//! - [`types`] - Product identifiers, prices, product records and merchant settings

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

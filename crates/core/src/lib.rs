//! TechStore Core - Shared types library.
//!
//! This crate provides common types used across all TechStore components:
//! - `storefront` - Checkout wizard, cart, catalog and the shopping assistant
//! - `cli` - Command-line driver for demo checkouts and assistant calls
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no clocks beyond
//! order number generation, no async. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, order numbers, prices and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

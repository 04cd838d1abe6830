//! TechStore storefront library.
//!
//! The checkout wizard and the collaborators around it: a cart with the
//! store's shipping and tax rules, the product catalog, and a mock shopping
//! assistant. Nothing here talks to a network or a database.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod services;

pub use error::{AppError, Result};

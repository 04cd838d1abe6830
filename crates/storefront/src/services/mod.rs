//! Services the storefront depends on.
//!
//! # Services
//!
//! - `assistant` - Product descriptions, customer chat, recommendations and
//!   search rewriting, backed by a canned model
//! - `listener` - Checkout listener that clears the cart once an order is placed

pub mod assistant;
pub mod listener;

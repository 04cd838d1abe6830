//! Subcommand implementations.

pub mod assistant;
pub mod checkout;

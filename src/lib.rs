//! Data-access gateway for a coffee-shop loyalty and sales database.
//!
//! [`BoutiqueCoffee`] wraps a single SQLite connection and exposes typed
//! operations for stores, coffees, promotions, member levels, customers and
//! purchases. [`compat::LegacyGateway`] offers the same operations with
//! sentinel return values.

// Core infrastructure modules
pub mod core;

// Feature-specific modules
pub mod compat;
pub mod config;
pub mod error_sink;
pub mod gateway;
pub mod model;

#[cfg(test)]
mod test_utils;

pub use crate::config::GatewayConfig;
pub use crate::core::{CoffeeError, Result};
pub use crate::error_sink::{ErrorEvent, ErrorSink, Severity};
pub use crate::gateway::BoutiqueCoffee;

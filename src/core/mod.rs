/// Core Module for Boutique Coffee
///
/// Shared infrastructure for the gateway: error types and connection
/// management.

pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{CoffeeError, Result, SqlDiagnostic};

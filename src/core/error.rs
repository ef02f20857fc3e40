/// Boutique Coffee Error Module
///
/// This module defines the error type returned by the strict gateway API and
/// the decomposition of database failures into message/state/code triples
/// used by the error sink.
use std::error::Error as StdError;
use thiserror::Error;

/// Error type for every gateway operation.
///
/// Covers the two failure categories the gateway distinguishes:
/// - failures reported by SQLite (constraint violations, I/O, syntax)
/// - failures raised before a statement reaches the database (validation,
///   configuration, script loading)
#[derive(Error, Debug)]
pub enum CoffeeError {
    /// Errors reported by SQLite through rusqlite
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A write statement completed but touched no rows
    #[error("{operation} failed, no rows affected")]
    NoRowsAffected { operation: &'static str },

    /// Input rejected before any statement was issued
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration loading and parsing errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system errors (bootstrap scripts, config files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Result to use CoffeeError as the error type.
pub type Result<T> = std::result::Result<T, CoffeeError>;

/// One decomposed database failure: message, state and numeric code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlDiagnostic {
    pub message: String,
    /// Name of the SQLite primary result code, empty when not applicable
    pub state: String,
    /// SQLite extended result code, 0 when not applicable
    pub code: i32,
}

impl SqlDiagnostic {
    /// Decomposes a single rusqlite error.
    pub fn from_rusqlite(err: &rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ffi, msg) => SqlDiagnostic {
                message: msg.clone().unwrap_or_else(|| ffi.to_string()),
                state: format!("{:?}", ffi.code),
                code: ffi.extended_code,
            },
            other => SqlDiagnostic {
                message: other.to_string(),
                state: String::new(),
                code: 0,
            },
        }
    }
}

impl CoffeeError {
    /// Returns true for failures that originate in the database layer.
    pub fn is_sql(&self) -> bool {
        matches!(self, CoffeeError::Database(_) | CoffeeError::NoRowsAffected { .. })
    }

    /// Decomposes this error and every chained rusqlite cause, outermost first.
    ///
    /// Non-database errors yield an empty list.
    pub fn diagnostics(&self) -> Vec<SqlDiagnostic> {
        match self {
            CoffeeError::NoRowsAffected { .. } => vec![SqlDiagnostic {
                message: self.to_string(),
                state: String::new(),
                code: 0,
            }],
            CoffeeError::Database(err) => {
                let mut out = vec![SqlDiagnostic::from_rusqlite(err)];
                let mut cause: Option<&(dyn StdError + 'static)> = err.source();
                while let Some(e) = cause {
                    if let Some(inner) = e.downcast_ref::<rusqlite::Error>() {
                        out.push(SqlDiagnostic::from_rusqlite(inner));
                    }
                    cause = e.source();
                }
                out
            }
            _ => Vec::new(),
        }
    }
}

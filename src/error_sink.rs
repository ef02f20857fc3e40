//! Structured error reporting for gateway failures.
//!
//! Every failed gateway operation produces one [`ErrorEvent`], handed to the
//! sink installed on that gateway. Callers that want the plain
//! one-line-per-call text stream can adapt a string callback with
//! [`sink_from_lines`].

use crate::core::{CoffeeError, SqlDiagnostic};

/// Marker line that opens the text rendering of a database failure.
pub const SQL_ERROR_MARKER: &str = "SQL ERROR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// A single reported failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorEvent {
    pub severity: Severity,
    /// Gateway operation that failed, e.g. "add_store"
    pub operation: &'static str,
    pub message: String,
    /// Database diagnostics, outermost first; empty for non-database failures
    pub diagnostics: Vec<SqlDiagnostic>,
}

impl ErrorEvent {
    pub fn from_error(operation: &'static str, severity: Severity, err: &CoffeeError) -> Self {
        ErrorEvent {
            severity,
            operation,
            message: err.to_string(),
            diagnostics: err.diagnostics(),
        }
    }

    pub fn is_sql(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Renders the event as the line sequence a text logger receives.
    ///
    /// Database failures render as the marker line followed by message,
    /// state and code for each diagnostic. Anything else is a single line.
    pub fn legacy_lines(&self) -> Vec<String> {
        if !self.is_sql() {
            return vec![self.message.clone()];
        }
        let mut lines = Vec::with_capacity(1 + self.diagnostics.len() * 3);
        lines.push(SQL_ERROR_MARKER.to_string());
        for diag in &self.diagnostics {
            lines.push(diag.message.clone());
            lines.push(diag.state.clone());
            lines.push(diag.code.to_string());
        }
        lines
    }
}

/// Receiver of error events.
pub type ErrorSink = Box<dyn Fn(&ErrorEvent) + Send>;

/// A sink that drops every event.
pub fn discard() -> ErrorSink {
    Box::new(|_| {})
}

/// Adapts a one-line text callback into a structured sink.
///
/// The callback is invoked once per line of [`ErrorEvent::legacy_lines`].
pub fn sink_from_lines<F>(logger: F) -> ErrorSink
where
    F: Fn(&str) + Send + 'static,
{
    Box::new(move |event: &ErrorEvent| {
        for line in event.legacy_lines() {
            logger(&line);
        }
    })
}

//! The data-access gateway.
//!
//! [`BoutiqueCoffee`] owns exactly one SQLite connection and maps each domain
//! operation onto parameterized statements. Operations return
//! [`Result`](crate::core::Result); every failure is also handed to the
//! gateway's [`ErrorSink`] before it is returned.
//!
//! Multi-statement operations (purchases, rankings) take `&mut self` and run
//! inside a scoped `rusqlite::Transaction`, which rolls back when dropped, so
//! the connection is back in autocommit mode on every exit path.
//!
//! The gateway is `Send` but not `Sync`: move it to a worker or guard it
//! externally, one connection per concurrent user.

mod catalog;
mod loyalty;
mod purchase;
mod ranking;

pub use ranking::{months_before, RankingProcedure};

use crate::config::GatewayConfig;
use crate::core::db::{execute_script, open_connection, run_script_file, MEMORY_PATH, SCHEMA_SQL};
use crate::core::{CoffeeError, Result};
use crate::error_sink::{self, ErrorEvent, ErrorSink, Severity};
use chrono::{Local, NaiveDateTime};
use rusqlite::{Connection, Params};
use std::path::Path;
use tracing::{debug, info, warn};

/// Gateway to the coffee-shop database over a single owned connection.
pub struct BoutiqueCoffee {
    conn: Connection,
    error_sink: ErrorSink,
    clock: fn() -> NaiveDateTime,
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl BoutiqueCoffee {
    /// Opens the configured database and runs the bootstrap script, if any.
    ///
    /// Bootstrap failures are reported and logged but do not fail
    /// construction.
    ///
    /// # Errors
    ///
    /// Returns `CoffeeError::Database` when the connection cannot be opened.
    pub fn open(config: &GatewayConfig) -> Result<Self> {
        Self::open_with_sink(config, error_sink::discard())
    }

    /// Like [`open`](Self::open), reporting bootstrap failures to `sink`.
    pub fn open_with_sink(config: &GatewayConfig, sink: ErrorSink) -> Result<Self> {
        let conn = open_connection(&config.database)?;
        let gateway = Self::from_connection(conn).with_error_sink(sink);
        info!("Boutique coffee gateway connected to {}", config.database.path);

        if let Some(bootstrap) = &config.bootstrap {
            // failure is already reported by run_sql_script
            if gateway.run_sql_script(&bootstrap.script).is_ok() {
                info!("Bootstrap script {:?} applied", bootstrap.script);
            }
        }
        Ok(gateway)
    }

    /// Opens a private in-memory database with no schema.
    pub fn open_in_memory() -> Result<Self> {
        Self::open(&GatewayConfig::new(MEMORY_PATH))
    }

    /// Wraps an already configured connection.
    pub fn from_connection(conn: Connection) -> Self {
        BoutiqueCoffee {
            conn,
            error_sink: error_sink::discard(),
            clock: local_now,
        }
    }

    pub fn with_error_sink(mut self, sink: ErrorSink) -> Self {
        self.error_sink = sink;
        self
    }

    /// Replaces the error sink.
    pub fn set_error_sink(&mut self, sink: ErrorSink) {
        self.error_sink = sink;
    }

    /// Replaces the error sink with a one-line text logger.
    pub fn set_line_logger<F>(&mut self, logger: F)
    where
        F: Fn(&str) + Send + 'static,
    {
        self.error_sink = error_sink::sink_from_lines(logger);
    }

    /// Sets the clock ranking windows are measured from.
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Executes every statement in the script file at `path`.
    pub fn run_sql_script<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.observe("run_sql_script", run_script_file(&self.conn, path))
    }

    /// Creates the bundled schema if it is not already present.
    pub fn install_schema(&self) -> Result<()> {
        self.observe("install_schema", execute_script(&self.conn, SCHEMA_SQL))
    }

    pub(crate) fn report(&self, operation: &'static str, err: &CoffeeError) {
        let severity = if err.is_sql() {
            Severity::Error
        } else {
            Severity::Warning
        };
        warn!("{} failed: {}", operation, err);
        (self.error_sink)(&ErrorEvent::from_error(operation, severity, err));
    }

    /// Reports the error of a failed result and passes the result through.
    pub(crate) fn observe<T>(&self, operation: &'static str, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            self.report(operation, err);
        }
        result
    }

    /// Runs a single insert and returns the generated row id.
    fn insert_returning_id<P: Params>(&self, label: &'static str, sql: &str, params: P) -> Result<i64> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let rows = stmt.execute(params)?;
        if rows == 0 {
            return Err(CoffeeError::NoRowsAffected { operation: label });
        }
        let id = self.conn.last_insert_rowid();
        debug!("{} inserted row {}", label, id);
        Ok(id)
    }

    /// Runs a single association insert.
    fn insert_association<P: Params>(&self, label: &'static str, sql: &str, params: P) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let rows = stmt.execute(params)?;
        if rows == 0 {
            return Err(CoffeeError::NoRowsAffected { operation: label });
        }
        debug!("{} linked", label);
        Ok(())
    }

    /// Collects the first column of every row as an id, in result order.
    fn query_ids<P: Params>(&self, sql: &str, params: P) -> Result<Vec<i64>> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let ids = stmt
            .query_map(params, |row| row.get(0))?
            .collect::<std::result::Result<Vec<i64>, _>>()?;
        Ok(ids)
    }
}

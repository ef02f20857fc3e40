/// Connection Management Module
///
/// Opens the single SQLite connection owned by a gateway, applies the
/// connection pragmas and executes SQL scripts against it.

use crate::config::DatabaseConfig;
use crate::core::Result;
use rusqlite::Connection;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Path value selecting an in-memory database.
pub const MEMORY_PATH: &str = ":memory:";

/// The schema shipped with the crate: tables, indexes and the points trigger.
pub const SCHEMA_SQL: &str = include_str!("../../../sql/schema.sql");

/// Opens a connection described by `config` and prepares it for use.
///
/// # Errors
///
/// Returns `CoffeeError::Database` when the file cannot be opened or a pragma
/// is rejected.
pub fn open_connection(config: &DatabaseConfig) -> Result<Connection> {
    let conn = if config.path == MEMORY_PATH {
        Connection::open_in_memory()?
    } else {
        Connection::open(&config.path)?
    };
    configure(&conn, config)?;
    debug!("Opened database connection to {}", config.path);
    Ok(conn)
}

/// Applies the connection pragmas every gateway connection relies on.
///
/// Foreign keys are enforced so that association and purchase inserts fail
/// on dangling references.
pub fn configure(conn: &Connection, config: &DatabaseConfig) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;

    if config.wal && config.path != MEMORY_PATH {
        let mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        debug!("Journal mode set to {}", mode);
    }
    Ok(())
}

/// Executes an arbitrary batch of SQL statements.
pub fn execute_script(conn: &Connection, sql: &str) -> Result<()> {
    conn.execute_batch(sql)?;
    Ok(())
}

/// Reads a script file and executes it as one batch.
pub fn run_script_file<P: AsRef<Path>>(conn: &Connection, path: P) -> Result<()> {
    let sql = fs::read_to_string(path.as_ref())?;
    debug!("Running SQL script {:?}", path.as_ref());
    execute_script(conn, &sql)
}

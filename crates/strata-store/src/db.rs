//! SQLite connection management

use crate::errors::{from_rusqlite, DriverResult};
use crate::sqlite::SqliteConnection;
use rusqlite::Connection;
use std::path::Path;

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> DriverResult<SqliteConnection> {
    let conn = Connection::open(path).map_err(from_rusqlite)?;
    configure(&conn)?;
    Ok(SqliteConnection::new(conn))
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> DriverResult<SqliteConnection> {
    let conn = Connection::open_in_memory().map_err(from_rusqlite)?;
    configure(&conn)?;
    Ok(SqliteConnection::new(conn))
}

/// Configure a connection for migration work
pub fn configure(conn: &Connection) -> DriverResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON")
        .map_err(from_rusqlite)?;

    // Scripts may take locks held briefly by other clients
    conn.busy_timeout(std::time::Duration::from_secs(5))
        .map_err(from_rusqlite)?;

    Ok(())
}

//! Schema script and database initialization.

use rusqlite::Connection;

use super::counters::{seed_counters, SeedReport};
use super::StorageError;
use crate::config::RedeemsConfig;

/// Schema script. Drops and recreates every table it defines.
pub const SCHEMA: &str = include_str!("schema.sql");

/// Apply per-connection pragmas.
///
/// Returns the journal mode SQLite settled on (`memory` for in-memory databases).
pub fn apply_pragmas(conn: &Connection) -> Result<String, rusqlite::Error> {
    let mode = conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
        row.get::<_, String>(0)
    })?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    Ok(mode)
}

/// Execute the schema script, discarding any existing data.
pub fn initialize_schema(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(SCHEMA)?;
    tracing::debug!("Schema initialized");
    Ok(())
}

/// Clear the existing data, create fresh tables and seed counters.
pub fn init_db(conn: &Connection, redeems: &RedeemsConfig) -> Result<SeedReport, StorageError> {
    initialize_schema(conn)?;
    let report = seed_counters(conn, redeems);
    tracing::info!(
        inserted = report.inserted.len(),
        skipped = report.skipped.len(),
        "Database initialized"
    );
    Ok(report)
}

//! Test utilities and fixtures for tlapbot tests.
//!
//! Provides:
//! - Temporary database directories
//! - Redeems configuration builders
//! - Raw SQL helpers for arranging state

#![allow(dead_code)]

use rusqlite::Connection;
use std::path::PathBuf;
use tempfile::TempDir;
use tlapbot::config::{RedeemInfo, RedeemKind, RedeemsConfig};
use tlapbot::App;

/// Test fixture that manages a temporary database directory.
///
/// The directory is automatically cleaned up when the fixture is dropped.
pub struct TestFixture {
    /// Temporary directory for test database
    pub temp_dir: TempDir,
    /// Path to the database file
    pub db_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with a temporary database directory.
    pub fn new() -> Self {
        tlapbot::observability::tracing::init_test_tracing();
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        Self { temp_dir, db_path }
    }

    /// Get the database path as a string.
    pub fn db_path_str(&self) -> &str {
        self.db_path.to_str().expect("invalid path")
    }

    /// Build an app over this fixture's database.
    pub fn app(&self, redeems: RedeemsConfig) -> App {
        App::new(&self.db_path, redeems)
    }

    /// Open a side connection for arranging or inspecting rows directly.
    pub fn raw(&self) -> Connection {
        Connection::open(&self.db_path).expect("failed to open raw connection")
    }

    /// Write a redeems file into the fixture directory and return its path.
    pub fn write_redeems(&self, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join("redeems.toml");
        std::fs::write(&path, contents).expect("failed to write redeems file");
        path
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a redeems mapping from (name, kind) pairs.
pub fn redeems(entries: &[(&str, RedeemKind)]) -> RedeemsConfig {
    entries
        .iter()
        .map(|(name, kind)| (name.to_string(), RedeemInfo::of_kind(*kind)))
        .collect()
}

/// Counter rows as (name, count), in name order.
pub fn counter_rows(conn: &Connection) -> Vec<(String, i64)> {
    let mut stmt = conn
        .prepare("SELECT name, count FROM counters ORDER BY name")
        .expect("prepare failed");
    stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .expect("query failed")
        .collect::<Result<Vec<_>, _>>()
        .expect("row decode failed")
}

/// Number of rows in the redeem queue.
pub fn queue_len(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM redeem_queue", [], |row| row.get(0))
        .expect("count failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.temp_dir.path().exists());
        assert!(fixture.db_path_str().contains("test.db"));
    }
}

//! Request-scoped database access.
//!
//! A [`RequestContext`] owns at most one SQLite connection. The connection is
//! opened the first time [`RequestContext::db`] is called and closed exactly
//! once when the context is torn down or dropped.

use rusqlite::{Connection, OpenFlags};
use std::path::Path;

use crate::app::App;
use crate::storage::schema::apply_pragmas;
use crate::storage::{self, ClearReport, Counter, QueuedRedeem, SeedReport, StorageError};

/// Open a read-write connection, creating the file and its directory if needed.
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created, the file
/// cannot be opened, or the pragmas cannot be applied.
pub fn open_connection(path: &Path) -> Result<Connection, StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| StorageError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|source| StorageError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    apply_pragmas(&conn)?;
    Ok(conn)
}

/// Scope that lazily holds one database connection.
pub struct RequestContext<'a> {
    app: &'a App,
    conn: Option<Connection>,
}

impl<'a> RequestContext<'a> {
    pub(crate) fn new(app: &'a App) -> Self {
        Self { app, conn: None }
    }

    /// The context's connection, opened on first use and cached afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection has to be opened and opening fails.
    /// A failed open leaves the context without a connection.
    pub fn db(&mut self) -> Result<&mut Connection, StorageError> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => {
                let conn = open_connection(self.app.database())?;
                self.app.stats().record_open();
                tracing::debug!(path = %self.app.database().display(), "Opened database connection");
                conn
            }
        };
        Ok(self.conn.insert(conn))
    }

    /// Whether a connection is currently open.
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Close the connection if one was opened. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        let Some(conn) = self.conn.take() else {
            return;
        };
        self.app.stats().record_close();
        match conn.close() {
            Ok(()) => tracing::debug!("Closed database connection"),
            // The connection is dropped along with the error, which still releases it.
            Err((_conn, e)) => tracing::warn!(error = %e, "Error closing database connection"),
        }
    }

    /// Drop all data, recreate the tables and seed configured counters.
    ///
    /// Counters that fail to insert are listed in the report, not returned
    /// as errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be opened or the schema
    /// script fails.
    pub fn init_db(&mut self) -> Result<SeedReport, StorageError> {
        let app = self.app;
        storage::init_db(self.db()?, app.redeems())
    }

    /// Empty the redeem queue and zero every counter.
    ///
    /// # Errors
    ///
    /// Returns an error if either statement fails; the transaction is then
    /// rolled back.
    pub fn clear_queue(&mut self) -> Result<ClearReport, StorageError> {
        storage::clear_redeem_queue(self.db()?)
    }

    /// Replace the counters with the ones currently configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the old counters cannot be deleted. Nothing is
    /// seeded in that case.
    pub fn refresh_counters(&mut self) -> Result<SeedReport, StorageError> {
        let app = self.app;
        storage::refresh_counters(self.db()?, app.redeems())
    }

    /// All counters in name order.
    pub fn counters(&mut self) -> Result<Vec<Counter>, StorageError> {
        storage::list_counters(self.db()?)
    }

    /// Queued redeems, oldest first.
    pub fn pending_redeems(&mut self) -> Result<Vec<QueuedRedeem>, StorageError> {
        storage::pending_redeems(self.db()?)
    }
}

impl Drop for RequestContext<'_> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RedeemsConfig;
    use tempfile::TempDir;

    fn test_app(temp_dir: &TempDir) -> App {
        App::new(temp_dir.path().join("test.db"), RedeemsConfig::default())
    }

    #[test]
    fn test_db_is_lazy_and_cached() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_app(&temp_dir);

        let mut ctx = app.context();
        assert!(!ctx.is_open());
        assert_eq!(app.connection_stats().opened, 0);

        ctx.db().unwrap();
        ctx.db().unwrap();
        assert!(ctx.is_open());
        assert_eq!(app.connection_stats().opened, 1);
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_app(&temp_dir);

        let mut ctx = app.context();
        ctx.db().unwrap();
        ctx.teardown();
        ctx.teardown();
        drop(ctx);

        let stats = app.connection_stats();
        assert_eq!(stats.opened, 1);
        assert_eq!(stats.closed, 1);
    }

    #[test]
    fn test_unused_context_opens_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_app(&temp_dir);

        drop(app.context());
        let stats = app.connection_stats();
        assert_eq!(stats.opened, 0);
        assert_eq!(stats.closed, 0);
        assert!(!temp_dir.path().join("test.db").exists());
    }

    #[test]
    fn test_open_connection_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("instance").join("nested").join("test.db");

        let conn = open_connection(&path).unwrap();
        drop(conn);
        assert!(path.exists());
    }

    #[test]
    fn test_context_reopens_after_teardown() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_app(&temp_dir);

        let mut ctx = app.context();
        ctx.db().unwrap();
        ctx.teardown();
        ctx.db().unwrap();
        drop(ctx);

        let stats = app.connection_stats();
        assert_eq!(stats.opened, 2);
        assert_eq!(stats.closed, 2);
    }
}

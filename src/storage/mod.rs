//! SQLite storage layer for tlapbot.
//!
//! Provides:
//! - Schema initialization and counter seeding
//! - Redeem queue maintenance
//! - Counter refresh from configuration

pub mod counters;
pub mod queue;
pub mod schema;

use std::path::PathBuf;
use thiserror::Error;

pub use counters::{list_counters, refresh_counters, seed_counters, Counter, SeedReport};
pub use queue::{clear_redeem_queue, enqueue_redeem, pending_redeems, ClearReport, QueuedRedeem};
pub use schema::{init_db, initialize_schema};

/// Error type for storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to open database {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to create database directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

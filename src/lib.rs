//! tlapbot: redeem queue and counter storage for a stream bot.
//!
//! Every database access happens inside a [`context::RequestContext`], which
//! lazily opens one SQLite connection and closes it when the context ends.
//!
//! # Modules
//!
//! - [`app`]: Shared application state and context creation
//! - [`config`]: CLI, environment and redeems configuration
//! - [`context`]: Request-scoped connection handling
//! - [`observability`]: Logging setup
//! - [`storage`]: Schema, counters and the redeem queue

// Lint configuration
#![warn(clippy::all)]
#![allow(
    clippy::module_name_repetitions,    // storage::StorageError is fine
    clippy::must_use_candidate,         // Not all functions need #[must_use]
    clippy::missing_errors_doc,         // Error docs can be verbose
    clippy::missing_panics_doc,         // Panic docs can be verbose
    clippy::needless_raw_string_hashes  // r#""# is fine for SQL
)]

pub mod app;
pub mod config;
pub mod context;
pub mod observability;
pub mod storage;

pub use app::App;
pub use context::RequestContext;

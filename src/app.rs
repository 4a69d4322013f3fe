//! Application state shared by every request context.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::config::{Config, ConfigError, RedeemsConfig};
use crate::context::RequestContext;

/// Counts connections opened and closed by request contexts.
#[derive(Debug, Default)]
pub struct ConnectionStats {
    opened: AtomicUsize,
    closed: AtomicUsize,
}

impl ConnectionStats {
    pub(crate) fn record_open(&self) {
        self.opened.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_close(&self) {
        self.closed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ConnectionSnapshot {
        ConnectionSnapshot {
            opened: self.opened.load(Ordering::Relaxed),
            closed: self.closed.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`ConnectionStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionSnapshot {
    pub opened: usize,
    pub closed: usize,
}

/// Database location plus the configured redeems.
#[derive(Debug)]
pub struct App {
    database: PathBuf,
    redeems: RedeemsConfig,
    stats: ConnectionStats,
}

impl App {
    pub fn new(database: impl Into<PathBuf>, redeems: RedeemsConfig) -> Self {
        Self {
            database: database.into(),
            redeems,
            stats: ConnectionStats::default(),
        }
    }

    /// Build the app from CLI/environment configuration.
    ///
    /// A missing redeems file yields an empty redeem list.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let redeems = config.load_redeems()?;
        Ok(Self::new(config.database.clone(), redeems))
    }

    /// Like [`App::from_config`], but a redeems file must be configured.
    ///
    /// Used by operations that seed or replace counters, where an empty
    /// redeem list would delete every counter.
    pub fn from_config_with_redeems(config: &Config) -> Result<Self, ConfigError> {
        let redeems = config.require_redeems()?;
        Ok(Self::new(config.database.clone(), redeems))
    }

    pub fn database(&self) -> &Path {
        &self.database
    }

    pub fn redeems(&self) -> &RedeemsConfig {
        &self.redeems
    }

    pub(crate) fn stats(&self) -> &ConnectionStats {
        &self.stats
    }

    pub fn connection_stats(&self) -> ConnectionSnapshot {
        self.stats.snapshot()
    }

    /// Start a new request context. Its connection opens on first use.
    pub fn context(&self) -> RequestContext<'_> {
        RequestContext::new(self)
    }

    /// Run `f` inside a fresh request context, then tear the context down.
    ///
    /// Teardown happens whether `f` succeeds, fails or panics.
    pub fn with_context<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut RequestContext<'_>) -> Result<T, E>,
    {
        let mut ctx = self.context();
        let result = f(&mut ctx);
        ctx.teardown();
        result
    }
}

//! Configuration parsing for tlapbot.
//!
//! Supports:
//! - CLI arguments via clap, with environment variable fallbacks
//! - A TOML redeems file describing the configured redeems

use clap::Args;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read redeems file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse redeems file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no redeems file configured (pass --redeems or set TLAPBOT_REDEEMS)")]
    MissingRedeems,
}

/// Global settings shared by every command.
#[derive(Args, Debug, Clone)]
pub struct Config {
    /// Path to the SQLite database file
    #[arg(long, env = "TLAPBOT_DATABASE", default_value = "instance/tlapbot.sqlite")]
    pub database: PathBuf,

    /// Path to the TOML file describing configured redeems
    #[arg(long, env = "TLAPBOT_REDEEMS")]
    pub redeems: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TLAPBOT_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// Load the redeems mapping named by `--redeems`.
    ///
    /// Without a redeems file the mapping is empty. Commands that seed or
    /// replace counters use [`Config::require_redeems`] instead.
    pub fn load_redeems(&self) -> Result<RedeemsConfig, ConfigError> {
        match &self.redeems {
            Some(path) => RedeemsConfig::load(path),
            None => Ok(RedeemsConfig::default()),
        }
    }

    /// Load the redeems mapping, failing when no redeems file is configured.
    pub fn require_redeems(&self) -> Result<RedeemsConfig, ConfigError> {
        let path = self.redeems.as_ref().ok_or(ConfigError::MissingRedeems)?;
        RedeemsConfig::load(path)
    }

    /// Create a configuration for tests rooted at the given database path.
    #[cfg(test)]
    pub fn test_config(database: PathBuf) -> Self {
        Self {
            database,
            redeems: None,
            log_level: "debug".into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: PathBuf::from("instance/tlapbot.sqlite"),
            redeems: None,
            log_level: "info".into(),
        }
    }
}

/// Discriminator for what a redeem does once redeemed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedeemKind {
    /// Bumps a named tally instead of entering the queue.
    Counter,
    List,
    Note,
    Milestone,
}

/// Metadata for one configured redeem.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RedeemInfo {
    #[serde(rename = "type")]
    pub kind: RedeemKind,
    #[serde(default)]
    pub price: Option<u64>,
    #[serde(default)]
    pub info: Option<String>,
    /// Target for milestone redeems.
    #[serde(default)]
    pub goal: Option<u64>,
}

/// Mapping of redeem name to its metadata.
///
/// Ordered by name so seeding is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RedeemsConfig {
    #[serde(default)]
    pub redeems: BTreeMap<String, RedeemInfo>,
}

impl RedeemsConfig {
    /// Read and parse a redeems file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse redeems from TOML text.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Names of every redeem of type `counter`, in name order.
    pub fn counter_names(&self) -> impl Iterator<Item = &str> {
        self.redeems
            .iter()
            .filter(|(_, info)| info.kind == RedeemKind::Counter)
            .map(|(name, _)| name.as_str())
    }
}

impl FromIterator<(String, RedeemInfo)> for RedeemsConfig {
    fn from_iter<I: IntoIterator<Item = (String, RedeemInfo)>>(iter: I) -> Self {
        Self {
            redeems: iter.into_iter().collect(),
        }
    }
}

impl RedeemInfo {
    /// Bare metadata of the given kind.
    pub fn of_kind(kind: RedeemKind) -> Self {
        Self {
            kind,
            price: None,
            info: None,
            goal: None,
        }
    }
}

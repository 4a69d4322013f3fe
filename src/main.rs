//! tlapbot: maintenance commands for the bot's redeem database.
//!
//! # Usage
//!
//! ```bash
//! tlapbot --database instance/tlapbot.sqlite --redeems redeems.toml init-db
//! ```
//!
//! Environment variables can also be used:
//! - `TLAPBOT_DATABASE`: Path to the SQLite database
//! - `TLAPBOT_REDEEMS`: Path to the redeems TOML file
//! - `TLAPBOT_LOG_LEVEL` / `RUST_LOG`: Log level

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tlapbot::config::Config;
use tlapbot::observability::tracing::init_tracing;
use tlapbot::App;

/// Maintenance commands for the tlapbot redeem database.
#[derive(Parser)]
#[command(name = "tlapbot")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Clear the existing data and create new tables
    InitDb,
    /// Remove all redeems from the redeem queue
    ClearQueue,
    /// Refresh counters from the current config file (remove old ones, add new ones)
    RefreshCounters,
    /// List counters and their current counts
    Counters {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },
    /// List redeems waiting in the queue
    Queue {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.config.log_level);

    // Seeding from an empty redeem list would wipe every counter.
    let app = match cli.command {
        Commands::InitDb | Commands::RefreshCounters => {
            App::from_config_with_redeems(&cli.config)
        }
        _ => App::from_config(&cli.config),
    }
    .context("failed to load configuration")?;

    match cli.command {
        Commands::InitDb => commands::db::init_db(&app)?,
        Commands::ClearQueue => commands::db::clear_queue(&app)?,
        Commands::RefreshCounters => commands::db::refresh_counters(&app)?,
        Commands::Counters { output } => commands::show::counters(&app, output)?,
        Commands::Queue { output } => commands::show::queue(&app, output)?,
    }

    Ok(())
}

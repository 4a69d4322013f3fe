//! Database maintenance commands.

use anyhow::{Context, Result};
use tlapbot::storage::SeedReport;
use tlapbot::App;

pub fn init_db(app: &App) -> Result<()> {
    let report = app
        .with_context(|ctx| ctx.init_db())
        .context("failed to initialize the database")?;
    log_seed(&report);
    println!("Initialized the database.");
    Ok(())
}

pub fn clear_queue(app: &App) -> Result<()> {
    let report = app
        .with_context(|ctx| ctx.clear_queue())
        .context("failed to clear the redeem queue")?;
    tracing::info!(
        removed_redeems = report.removed_redeems,
        reset_counters = report.reset_counters,
        "Queue cleared"
    );
    println!("Cleared redeem queue.");
    Ok(())
}

pub fn refresh_counters(app: &App) -> Result<()> {
    let report = app
        .with_context(|ctx| ctx.refresh_counters())
        .context("failed to refresh counters")?;
    log_seed(&report);
    println!("Counters refreshed.");
    Ok(())
}

fn log_seed(report: &SeedReport) {
    tracing::info!(
        inserted = report.inserted.len(),
        skipped = report.skipped.len(),
        "Counters seeded"
    );
    if !report.skipped.is_empty() {
        tracing::warn!(skipped = ?report.skipped, "Some counters were not inserted");
    }
}

//! Read-only listings of counters and the redeem queue.

use anyhow::{Context, Result};
use serde::Serialize;
use tlapbot::storage::{Counter, QueuedRedeem};
use tlapbot::App;

use crate::OutputFormat;

#[derive(Serialize)]
struct CountersOutput {
    counters: Vec<Counter>,
    total: usize,
}

#[derive(Serialize)]
struct QueueOutput {
    redeems: Vec<QueuedRedeem>,
    total: usize,
}

pub fn counters(app: &App, format: OutputFormat) -> Result<()> {
    let counters = app
        .with_context(|ctx| ctx.counters())
        .context("failed to read counters")?;
    let output = CountersOutput {
        total: counters.len(),
        counters,
    };

    match format {
        OutputFormat::Text => {
            if output.counters.is_empty() {
                println!("No counters found.");
            } else {
                println!("{:<40} {:>10}", "COUNTER", "COUNT");
                println!("{}", "-".repeat(51));
                for counter in &output.counters {
                    println!("{:<40} {:>10}", counter.name, counter.count);
                }
                println!();
                println!("Total: {} counter(s)", output.total);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

pub fn queue(app: &App, format: OutputFormat) -> Result<()> {
    let redeems = app
        .with_context(|ctx| ctx.pending_redeems())
        .context("failed to read the redeem queue")?;
    let output = QueueOutput {
        total: redeems.len(),
        redeems,
    };

    match format {
        OutputFormat::Text => {
            if output.redeems.is_empty() {
                println!("Redeem queue is empty.");
            } else {
                println!(
                    "{:>6} {:<20} {:<24} {:<20} NOTE",
                    "ID", "CREATED", "REDEEM", "REDEEMER"
                );
                println!("{}", "-".repeat(80));
                for redeem in &output.redeems {
                    println!(
                        "{:>6} {:<20} {:<24} {:<20} {}",
                        redeem.id,
                        redeem.created.format("%Y-%m-%d %H:%M:%S").to_string(),
                        redeem.redeem,
                        redeem.redeemer_id,
                        redeem.note.as_deref().unwrap_or("-")
                    );
                }
                println!();
                println!("Total: {} redeem(s)", output.total);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

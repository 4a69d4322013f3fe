//! Counter rows seeded from configured `counter` redeems.

use rusqlite::{params, Connection};
use serde::Serialize;

use super::StorageError;
use crate::config::RedeemsConfig;

/// A named tally for a counter-type redeem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Counter {
    pub name: String,
    pub count: i64,
}

/// Outcome of a best-effort seeding pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    /// Counter names that were inserted.
    pub inserted: Vec<String>,
    /// Counter names whose insert failed (e.g. already present).
    pub skipped: Vec<String>,
}

/// Insert one zero-valued counter per configured counter redeem.
///
/// Each insert stands alone: a failing entry is logged and skipped and the
/// rest are still attempted. Nothing is rolled back.
pub fn seed_counters(conn: &Connection, redeems: &RedeemsConfig) -> SeedReport {
    let mut report = SeedReport::default();

    for name in redeems.counter_names() {
        match conn.execute(
            "INSERT INTO counters(name, count) VALUES(?1, 0)",
            params![name],
        ) {
            Ok(_) => report.inserted.push(name.to_string()),
            Err(e) => {
                tracing::warn!(counter = %name, error = %e, "Failed inserting counter");
                report.skipped.push(name.to_string());
            }
        }
    }

    report
}

/// Replace all counters with the ones currently configured.
///
/// A failed delete is returned before anything is seeded. Individual insert
/// failures during the re-seed are skipped as in [`seed_counters`].
pub fn refresh_counters(
    conn: &Connection,
    redeems: &RedeemsConfig,
) -> Result<SeedReport, StorageError> {
    let removed = conn.execute("DELETE FROM counters", [])?;
    tracing::debug!(removed, "Deleted old counters");

    let report = seed_counters(conn, redeems);
    tracing::info!(
        removed,
        inserted = report.inserted.len(),
        skipped = report.skipped.len(),
        "Counters refreshed"
    );
    Ok(report)
}

/// All counters in name order.
pub fn list_counters(conn: &Connection) -> Result<Vec<Counter>, StorageError> {
    let mut stmt = conn.prepare("SELECT name, count FROM counters ORDER BY name ASC")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Counter {
                name: row.get(0)?,
                count: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

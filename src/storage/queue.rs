//! Redeem queue maintenance.

use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use serde::Serialize;

use super::StorageError;

/// A redemption waiting to be handled by the streamer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueuedRedeem {
    pub id: i64,
    /// When the redeem was queued, in UTC.
    pub created: NaiveDateTime,
    pub redeem: String,
    pub redeemer_id: String,
    pub note: Option<String>,
}

/// Rows touched by [`clear_redeem_queue`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClearReport {
    pub removed_redeems: usize,
    pub reset_counters: usize,
}

/// Add a redemption to the queue, returning its row id.
pub fn enqueue_redeem(
    conn: &Connection,
    redeem: &str,
    redeemer_id: &str,
    note: Option<&str>,
) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO redeem_queue(redeem, redeemer_id, note) VALUES(?1, ?2, ?3)",
        params![redeem, redeemer_id, note],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Pending redemptions, oldest first.
pub fn pending_redeems(conn: &Connection) -> Result<Vec<QueuedRedeem>, StorageError> {
    let mut stmt = conn.prepare(
        "SELECT id, created, redeem, redeemer_id, note FROM redeem_queue ORDER BY id ASC",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(QueuedRedeem {
                id: row.get(0)?,
                created: row.get(1)?,
                redeem: row.get(2)?,
                redeemer_id: row.get(3)?,
                note: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Empty the redeem queue and zero every counter.
///
/// Both statements share one transaction; on error neither takes effect.
pub fn clear_redeem_queue(conn: &mut Connection) -> Result<ClearReport, StorageError> {
    let tx = conn.transaction()?;
    let removed_redeems = tx.execute("DELETE FROM redeem_queue", [])?;
    let reset_counters = tx.execute("UPDATE counters SET count = 0", [])?;
    tx.commit()?;

    tracing::info!(removed_redeems, reset_counters, "Redeem queue cleared");
    Ok(ClearReport {
        removed_redeems,
        reset_counters,
    })
}

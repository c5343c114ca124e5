//! SQLite-backed audit log of sync passes

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use ordersync_core::SyncLogRepository;
use ordersync_domain::{LogStatus, OrderSyncError, Result, SyncLogEntry};
use rusqlite::params;
use tokio::task;
use uuid::Uuid;

use super::manager::{map_sql_error, DbManager};

/// `SyncLogRepository` over the `sync_logs` table.
///
/// `details` is stored as a JSON array of outcomes; `created_at` as unix
/// milliseconds.
pub struct SqliteSyncLogRepository {
    db: Arc<DbManager>,
}

impl SqliteSyncLogRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SyncLogRepository for SqliteSyncLogRepository {
    async fn append(&self, entry: &SyncLogEntry) -> Result<()> {
        let db = self.db.clone();
        let entry = entry.clone();

        task::spawn_blocking(move || {
            let details = serde_json::to_string(&entry.details)
                .map_err(|e| OrderSyncError::Internal(e.to_string()))?;
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO sync_logs (id, action, status, message, details, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    entry.id.to_string(),
                    entry.action,
                    entry.status.as_str(),
                    entry.message,
                    details,
                    entry.created_at.timestamp_millis(),
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(|e| OrderSyncError::Internal(e.to_string()))?
    }

    async fn recent(&self, limit: usize) -> Result<Vec<SyncLogEntry>> {
        let db = self.db.clone();
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        task::spawn_blocking(move || {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, action, status, message, details, created_at FROM sync_logs
                     ORDER BY created_at DESC, id DESC LIMIT ?1",
                )
                .map_err(map_sql_error)?;

            let raw = stmt
                .query_map([limit], |row| -> rusqlite::Result<RawLogRow> {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, i64>(5)?,
                    ))
                })
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;

            raw.into_iter().map(decode_row).collect::<Result<Vec<_>>>()
        })
        .await
        .map_err(|e| OrderSyncError::Internal(e.to_string()))?
    }
}

type RawLogRow = (String, String, String, String, String, i64);

fn decode_row(raw: RawLogRow) -> Result<SyncLogEntry> {
    let (id, action, status, message, details, created_at) = raw;
    Ok(SyncLogEntry {
        id: Uuid::parse_str(&id)
            .map_err(|e| OrderSyncError::Database(format!("bad log id: {e}")))?,
        action,
        status: LogStatus::from_str(&status).map_err(OrderSyncError::Database)?,
        message,
        details: serde_json::from_str(&details)
            .map_err(|e| OrderSyncError::Database(format!("bad log details: {e}")))?,
        created_at: DateTime::from_timestamp_millis(created_at)
            .ok_or_else(|| OrderSyncError::Database(format!("bad log timestamp: {created_at}")))?,
    })
}

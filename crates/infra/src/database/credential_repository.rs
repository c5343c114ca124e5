//! SQLite-backed credential registry

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use ordersync_core::CredentialRegistry;
use ordersync_domain::{CredentialRow, OrderSyncError, Result};
use rusqlite::{params, params_from_iter};
use tokio::task;
use tracing::debug;

use super::manager::{map_sql_error, DbManager};

/// `CredentialRegistry` over the `channel_credentials` table.
pub struct SqliteCredentialRegistry {
    db: Arc<DbManager>,
}

impl SqliteCredentialRegistry {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Insert a credential or re-activate an existing one.
    pub async fn upsert_credential(
        &self,
        channel: &str,
        sub_account_id: Option<&str>,
        is_active: bool,
    ) -> Result<()> {
        let db = self.db.clone();
        let channel = channel.to_string();
        let sub_account = sub_account_id.unwrap_or_default().to_string();

        task::spawn_blocking(move || {
            let conn = db.get_connection()?;
            let now = Utc::now().timestamp();
            conn.execute(
                "INSERT INTO channel_credentials (channel, sub_account_id, is_active, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)
                 ON CONFLICT(channel, sub_account_id)
                 DO UPDATE SET is_active = excluded.is_active, updated_at = excluded.updated_at",
                params![channel, sub_account, is_active, now],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(|e| OrderSyncError::Internal(e.to_string()))?
    }

    /// Toggle a credential. Returns `NotFound` when no such row exists.
    pub async fn set_active(
        &self,
        channel: &str,
        sub_account_id: Option<&str>,
        is_active: bool,
    ) -> Result<()> {
        let db = self.db.clone();
        let channel = channel.to_string();
        let sub_account = sub_account_id.unwrap_or_default().to_string();

        task::spawn_blocking(move || {
            let conn = db.get_connection()?;
            let updated = conn
                .execute(
                    "UPDATE channel_credentials SET is_active = ?3, updated_at = ?4
                     WHERE channel = ?1 AND sub_account_id = ?2",
                    params![channel, sub_account, is_active, Utc::now().timestamp()],
                )
                .map_err(map_sql_error)?;

            if updated == 0 {
                return Err(OrderSyncError::NotFound(format!(
                    "no credential for channel '{channel}' and sub-account '{sub_account}'"
                )));
            }
            Ok(())
        })
        .await
        .map_err(|e| OrderSyncError::Internal(e.to_string()))?
    }
}

#[async_trait]
impl CredentialRegistry for SqliteCredentialRegistry {
    async fn active_credentials(&self, channels: &[&str]) -> Result<Vec<CredentialRow>> {
        if channels.is_empty() {
            return Ok(Vec::new());
        }

        let db = self.db.clone();
        let channels: Vec<String> = channels.iter().map(|c| (*c).to_string()).collect();

        task::spawn_blocking(move || {
            let conn = db.get_connection()?;
            let placeholders = vec!["?"; channels.len()].join(", ");
            let sql = format!(
                "SELECT channel, sub_account_id, is_active FROM channel_credentials
                 WHERE is_active = 1 AND channel IN ({placeholders})
                 ORDER BY id"
            );

            let mut stmt = conn.prepare(&sql).map_err(map_sql_error)?;
            let rows = stmt
                .query_map(params_from_iter(channels.iter()), |row| {
                    let sub_account: String = row.get(1)?;
                    Ok(CredentialRow {
                        channel: row.get(0)?,
                        sub_account_id: (!sub_account.is_empty()).then_some(sub_account),
                        is_active: row.get(2)?,
                    })
                })
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;

            debug!(count = rows.len(), "loaded active channel credentials");
            Ok(rows)
        })
        .await
        .map_err(|e| OrderSyncError::Internal(e.to_string()))?
    }
}

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ordersync_core::{CredentialRegistry, SyncLogRepository};
use ordersync_domain::{CredentialRow, OrderSyncError, Result, SyncLogEntry};

/// In-memory registry. Filters like the real one: active rows whose channel
/// is in the requested set, in insertion order.
#[derive(Default, Clone)]
pub struct MockCredentialRegistry {
    rows: Arc<Vec<CredentialRow>>,
    failure: Option<OrderSyncError>,
}

impl MockCredentialRegistry {
    pub fn new(rows: Vec<CredentialRow>) -> Self {
        Self { rows: Arc::new(rows), failure: None }
    }

    pub fn failing(error: OrderSyncError) -> Self {
        Self { rows: Arc::new(Vec::new()), failure: Some(error) }
    }
}

#[async_trait]
impl CredentialRegistry for MockCredentialRegistry {
    async fn active_credentials(&self, channels: &[&str]) -> Result<Vec<CredentialRow>> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(self
            .rows
            .iter()
            .filter(|row| row.is_active && channels.contains(&row.channel.as_str()))
            .cloned()
            .collect())
    }
}

/// Registry that returns its rows verbatim, without filtering.
#[derive(Default, Clone)]
pub struct UnfilteredRegistry(pub Vec<CredentialRow>);

#[async_trait]
impl CredentialRegistry for UnfilteredRegistry {
    async fn active_credentials(&self, _channels: &[&str]) -> Result<Vec<CredentialRow>> {
        Ok(self.0.clone())
    }
}

/// Audit log that keeps entries in memory, optionally failing every write.
#[derive(Default, Clone)]
pub struct MockSyncLogRepository {
    entries: Arc<Mutex<Vec<SyncLogEntry>>>,
    fail_writes: bool,
}

impl MockSyncLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { entries: Arc::default(), fail_writes: true }
    }

    pub fn entries(&self) -> Vec<SyncLogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SyncLogRepository for MockSyncLogRepository {
    async fn append(&self, entry: &SyncLogEntry) -> Result<()> {
        if self.fail_writes {
            return Err(OrderSyncError::Database("sync_logs is read-only".into()));
        }
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<SyncLogEntry>> {
        Ok(self.entries.lock().unwrap().iter().rev().take(limit).cloned().collect())
    }
}

pub fn row(channel: &str, sub_account: Option<&str>) -> CredentialRow {
    CredentialRow {
        channel: channel.to_string(),
        sub_account_id: sub_account.map(String::from),
        is_active: true,
    }
}

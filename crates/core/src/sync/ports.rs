//! Port interfaces for order sync

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ordersync_domain::{
    AdapterError, ChannelTarget, CredentialRow, PersistedAutoSync, Result, SyncLogEntry,
    SyncOrdersRequest, SyncOrdersResponse, SyncOutcome,
};

/// Trait for reading sync-eligible credentials
#[async_trait]
pub trait CredentialRegistry: Send + Sync {
    /// Active credential rows whose channel is one of `channels`, in
    /// registry order.
    async fn active_credentials(&self, channels: &[&str]) -> Result<Vec<CredentialRow>>;
}

/// Trait for the channel adapter boundary (the `sync-orders` call)
///
/// Implementations must bound the call in time. HTTP-level failures come
/// back as `Err(AdapterError::Http)`; business-level failures come back as
/// `Ok` with `success: false`.
#[async_trait]
pub trait ChannelSyncPort: Send + Sync {
    async fn sync_orders(
        &self,
        request: &SyncOrdersRequest,
    ) -> std::result::Result<SyncOrdersResponse, AdapterError>;
}

/// Trait for the append-only audit log of passes
#[async_trait]
pub trait SyncLogRepository: Send + Sync {
    /// Append one entry
    async fn append(&self, entry: &SyncLogEntry) -> Result<()>;

    /// Most recent entries, newest first
    async fn recent(&self, limit: usize) -> Result<Vec<SyncLogEntry>>;
}

/// Trait for the durable auto-sync scheduler record
pub trait AutoSyncStore: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet
    fn load(&self) -> Result<Option<PersistedAutoSync>>;

    fn save(&self, state: &PersistedAutoSync) -> Result<()>;
}

/// Single-channel sync operation used by the auto-sync scheduler
///
/// Never fails: every error is folded into a failed outcome.
#[async_trait]
pub trait SingleChannelSync: Send + Sync {
    /// Sync one target over `[today - lookback_days, today]`, with the window
    /// computed at call time.
    async fn sync_channel(&self, target: &ChannelTarget, lookback_days: i64) -> SyncOutcome;
}

/// Source of wall-clock time
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

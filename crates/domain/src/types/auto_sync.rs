//! Auto-sync scheduler state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::sync::SyncResult;

/// Observable state of the auto-sync scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoSyncState {
    pub enabled: bool,
    pub last_sync_at: Option<DateTime<Utc>>,
    /// Result of the most recent trigger only.
    pub last_result: Option<SyncResult>,
    /// Rendering flag; never used for mutual exclusion.
    pub is_syncing: bool,
}

impl AutoSyncState {
    /// State restored from storage. `is_syncing` always starts false and
    /// `last_result` is not persisted.
    pub fn restored(persisted: &PersistedAutoSync) -> Self {
        Self {
            enabled: persisted.enabled,
            last_sync_at: persisted.last_sync_at,
            last_result: None,
            is_syncing: false,
        }
    }

    /// The durable subset of this state.
    pub fn persisted(&self) -> PersistedAutoSync {
        PersistedAutoSync { last_sync_at: self.last_sync_at, enabled: self.enabled }
    }
}

impl Default for AutoSyncState {
    fn default() -> Self {
        Self::restored(&PersistedAutoSync::default())
    }
}

/// Record written under the auto-sync storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedAutoSync {
    #[serde(default)]
    pub last_sync_at: Option<DateTime<Utc>>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

/// Missing or unreadable state fails open: enabled, never synced.
impl Default for PersistedAutoSync {
    fn default() -> Self {
        Self { last_sync_at: None, enabled: true }
    }
}

fn enabled_by_default() -> bool {
    true
}

//! Configuration structures
//!
//! Every section has defaults so a config file only needs the values it
//! overrides. Loading lives in `ordersync-infra::config`.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SYNC_CRON, DEFAULT_TIMEZONE};
use crate::errors::{OrderSyncError, Result};
use crate::types::Channel;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub adapter: AdapterConfig,
    pub sync: SyncConfig,
    pub auto_sync: AutoSyncConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Reject values that would only fail later at runtime.
    pub fn validate(&self) -> Result<()> {
        if self.database.path.trim().is_empty() {
            return Err(OrderSyncError::Config("database path must not be empty".into()));
        }
        if self.database.pool_size == 0 {
            return Err(OrderSyncError::Config("database pool size must be at least 1".into()));
        }
        url::Url::parse(&self.adapter.endpoint_url).map_err(|e| {
            OrderSyncError::Config(format!(
                "invalid adapter endpoint '{}': {e}",
                self.adapter.endpoint_url
            ))
        })?;
        if self.adapter.timeout_secs == 0 {
            return Err(OrderSyncError::Config("adapter timeout must be positive".into()));
        }
        if self.adapter.max_attempts == 0 {
            return Err(OrderSyncError::Config("adapter max attempts must be at least 1".into()));
        }
        if self.sync.cron_expression.trim().is_empty() {
            return Err(OrderSyncError::Config("sync cron expression must not be empty".into()));
        }
        if self.sync.job_timeout_secs == 0 {
            return Err(OrderSyncError::Config("sync job timeout must be positive".into()));
        }
        self.sync.timezone()?;
        Ok(())
    }
}

/// SQLite database holding credentials and sync logs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "ordersync.db".into(), pool_size: 4 }
    }
}

/// Channel adapter endpoint (the `sync-orders` function)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    pub endpoint_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Total attempts per call (initial try + retries on transport errors).
    pub max_attempts: u32,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            endpoint_url: "http://localhost:54321/functions/v1/marketplace-api".into(),
            api_key: None,
            timeout_secs: 60,
            max_attempts: 2,
        }
    }
}

/// Recurring orchestrator pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub enabled: bool,
    pub cron_expression: String,
    /// IANA zone used to decide what "today" is for the sync window.
    pub timezone: String,
    pub job_timeout_secs: u64,
}

impl SyncConfig {
    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| OrderSyncError::Config(format!("invalid timezone '{}': {e}", self.timezone)))
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cron_expression: DEFAULT_SYNC_CRON.into(),
            timezone: DEFAULT_TIMEZONE.into(),
            job_timeout_secs: 900,
        }
    }
}

/// Auto-sync scheduler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoSyncConfig {
    /// Channel synced by every auto-sync trigger.
    pub channel: Channel,
    /// Directory holding the persisted scheduler state.
    pub state_dir: String,
}

impl Default for AutoSyncConfig {
    fn default() -> Self {
        Self { channel: Channel::SmartStore, state_dir: ".ordersync".into() }
    }
}

/// Log output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".into(), json: false }
    }
}

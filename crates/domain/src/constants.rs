//! Application constants
//!
//! Centralized location for the sync policy constants shared by the
//! orchestrator, the adapters and the auto-sync scheduler.

use std::time::Duration;

// Windowing policy
pub const LOOKBACK_DAYS: i64 = 3;
pub const DEFAULT_TIMEZONE: &str = "Asia/Seoul";

// Adapter boundary
pub const SYNC_ORDERS_ACTION: &str = "sync-orders";
pub const MAX_ERROR_BODY_CHARS: usize = 200;
pub const SOFT_FAILURE_FALLBACK: &str = "sync failed";
pub const TRANSPORT_ERROR_PREFIX: &str = "error:";

// Audit log
pub const SCHEDULED_SYNC_LOG_ACTION: &str = "scheduled-order-sync";
pub const NO_TARGETS_MESSAGE: &str = "No active channel credentials to sync";

// Recurring pass (tokio-cron-scheduler uses a seconds field)
pub const DEFAULT_SYNC_CRON: &str = "0 0 * * * *";

// Auto-sync scheduler
pub const AUTO_SYNC_INTERVAL: Duration = Duration::from_secs(5 * 60);
pub const AUTO_SYNC_STORAGE_KEY: &str = "order-auto-sync";

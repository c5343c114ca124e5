//! Scheduling infrastructure for background order sync
//!
//! - [`OrderSyncScheduler`]: cron-driven multi-channel pass
//! - [`AutoSyncScheduler`]: five-minute single-channel auto-sync
//!
//! Both follow the same runtime rules:
//! - Explicit lifecycle management (start/stop)
//! - Join handles for spawned tasks
//! - Cancellation token support
//! - Timeout wrapping on all async operations

pub mod auto_sync;
pub mod error;
pub mod order_sync_scheduler;

pub use auto_sync::{AutoSyncScheduler, AutoSyncSchedulerBuilder, SuccessCallback};
pub use error::{SchedulerError, SchedulerResult};
pub use order_sync_scheduler::{OrderSyncScheduler, OrderSyncSchedulerConfig};

//! Tracing setup and command logging helpers

use std::time::Duration;

use ordersync_domain::{LoggingConfig, OrderSyncError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the configured level applies.
///
/// # Errors
/// Returns `OrderSyncError::Config` when the level is not a valid filter or a
/// subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), OrderSyncError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            OrderSyncError::Config(format!("invalid log level '{}': {e}", config.level))
        })?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| OrderSyncError::Config(format!("failed to install subscriber: {e}")))
}

/// Log the outcome of a command execution with structured fields.
///
/// Callers must avoid forwarding sensitive values in `command`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, success: bool) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, "command_execution_failure");
    }
}

/// Convert an `OrderSyncError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &OrderSyncError) -> &'static str {
    match error {
        OrderSyncError::Database(_) => "database",
        OrderSyncError::Config(_) => "config",
        OrderSyncError::Network(_) => "network",
        OrderSyncError::Registry(_) => "registry",
        OrderSyncError::Storage(_) => "storage",
        OrderSyncError::NotFound(_) => "not_found",
        OrderSyncError::InvalidInput(_) => "invalid_input",
        OrderSyncError::Internal(_) => "internal",
    }
}

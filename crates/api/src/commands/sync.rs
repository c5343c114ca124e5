//! Order sync commands

use std::sync::Arc;
use std::time::Instant;

use ordersync_core::SyncLogRepository;
use ordersync_domain::{AutoSyncState, SyncLogEntry, SyncReport, SyncResult};
use tracing::{info, warn};

use crate::utils::logging::{error_label, log_command_execution};
use crate::AppContext;

/// Upper bound for a single log query.
pub const MAX_LOG_LIMIT: usize = 100;

/// Run one orchestrator pass over every active credential now.
pub async fn sync_orders_now(ctx: &Arc<AppContext>) -> Result<SyncReport, String> {
    let command_name = "sync::sync_orders_now";
    let start = Instant::now();

    let result = ctx.order_sync.run_pass().await.map_err(|e| {
        warn!(command = command_name, error_type = error_label(&e), "order sync pass aborted");
        format!("Failed to sync orders: {e}")
    });

    log_command_execution(command_name, start.elapsed(), result.is_ok());
    result
}

/// Sync the auto-sync channel immediately.
///
/// Returns `Ok(None)` when a sync is already in flight; the request is
/// dropped, not queued.
pub async fn trigger_auto_sync(ctx: &Arc<AppContext>) -> Result<Option<SyncResult>, String> {
    let command_name = "sync::trigger_auto_sync";
    let start = Instant::now();

    let result = ctx.auto_sync.trigger_now().await;
    if result.is_none() {
        info!(command = command_name, "auto-sync already running; trigger ignored");
    }

    log_command_execution(command_name, start.elapsed(), true);
    Ok(result)
}

/// Turn auto-sync on or off and return the updated state.
pub async fn set_auto_sync_enabled(
    ctx: &Arc<AppContext>,
    enabled: bool,
) -> Result<AutoSyncState, String> {
    let command_name = "sync::set_auto_sync_enabled";
    let start = Instant::now();

    info!(command = command_name, enabled, "Toggling auto-sync");
    ctx.auto_sync.configure(enabled);

    log_command_execution(command_name, start.elapsed(), true);
    Ok(ctx.auto_sync.state())
}

/// Current auto-sync state for display.
pub async fn get_auto_sync_state(ctx: &Arc<AppContext>) -> Result<AutoSyncState, String> {
    Ok(ctx.auto_sync.state())
}

/// Most recent audit log entries, newest first. `limit` is clamped to
/// `1..=MAX_LOG_LIMIT`.
pub async fn get_recent_sync_logs(
    ctx: &Arc<AppContext>,
    limit: usize,
) -> Result<Vec<SyncLogEntry>, String> {
    let command_name = "sync::get_recent_sync_logs";
    let start = Instant::now();

    let result = ctx
        .sync_logs
        .recent(limit.clamp(1, MAX_LOG_LIMIT))
        .await
        .map_err(|e| format!("Failed to load sync logs: {e}"));

    log_command_execution(command_name, start.elapsed(), result.is_ok());
    result
}

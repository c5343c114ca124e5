//! Order sync orchestrator - core business logic
//!
//! One pass reads the active credentials, syncs each target strictly in
//! sequence and records a single audit log entry. Marketplace APIs rate
//! limit per credential, so adapter calls are never issued concurrently.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use chrono_tz::Tz;
use ordersync_domain::constants::{LOOKBACK_DAYS, SCHEDULED_SYNC_LOG_ACTION};
use ordersync_domain::{
    Channel, ChannelTarget, OrderSyncError, Result, SyncLogEntry, SyncOrdersRequest, SyncOutcome,
    SyncReport, SyncResult, SyncWindow,
};
use tracing::{debug, info, instrument, warn};

use super::ports::{
    ChannelSyncPort, Clock, CredentialRegistry, SingleChannelSync, SyncLogRepository, SystemClock,
};

/// Sync orchestrator service
pub struct OrderSyncService {
    registry: Arc<dyn CredentialRegistry>,
    adapter: Arc<dyn ChannelSyncPort>,
    log: Arc<dyn SyncLogRepository>,
    clock: Arc<dyn Clock>,
    timezone: Tz,
    log_action: String,
}

impl OrderSyncService {
    /// Create a new orchestrator using the system clock and the default
    /// time zone.
    pub fn new(
        registry: Arc<dyn CredentialRegistry>,
        adapter: Arc<dyn ChannelSyncPort>,
        log: Arc<dyn SyncLogRepository>,
    ) -> Self {
        Self {
            registry,
            adapter,
            log,
            clock: Arc::new(SystemClock),
            timezone: chrono_tz::Asia::Seoul,
            log_action: SCHEDULED_SYNC_LOG_ACTION.to_string(),
        }
    }

    /// Replace the wall clock used for sync windows.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Time zone that decides which calendar day "today" is.
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Action name recorded on audit log entries.
    pub fn with_log_action(mut self, action: impl Into<String>) -> Self {
        self.log_action = action.into();
        self
    }

    /// Today's date in the orchestrator's time zone.
    pub fn today(&self) -> NaiveDate {
        self.clock.now().with_timezone(&self.timezone).date_naive()
    }

    /// Window for a target synced right now.
    pub fn current_window(&self, lookback_days: i64) -> SyncWindow {
        SyncWindow::lookback(self.today(), lookback_days)
    }

    /// Run one pass across every active target.
    ///
    /// Only a registry failure aborts the pass; in that case nothing is
    /// persisted. Every adapter failure becomes a failed outcome and the
    /// remaining targets still run.
    #[instrument(skip(self))]
    pub async fn run_pass(&self) -> Result<SyncReport> {
        let channels = Channel::registry_ids();
        let rows = self.registry.active_credentials(&channels).await.map_err(|err| match err {
            OrderSyncError::Registry(message) => OrderSyncError::Registry(message),
            other => OrderSyncError::Registry(other.to_string()),
        })?;

        let targets: Vec<ChannelTarget> = rows
            .iter()
            .filter_map(|row| {
                let target = row.to_target();
                if target.is_none() {
                    warn!(
                        channel = %row.channel,
                        is_active = row.is_active,
                        "skipping credential that is inactive or not a supported channel"
                    );
                }
                target
            })
            .collect();

        if targets.is_empty() {
            info!("no active channel credentials; nothing to sync");
            return Ok(SyncReport::empty());
        }

        info!(targets = targets.len(), "starting order sync pass");

        let mut outcomes = Vec::with_capacity(targets.len());
        for target in targets {
            let window = self.current_window(LOOKBACK_DAYS);
            outcomes.push(self.sync_target(target, &window).await);
        }

        let report = SyncReport::from_outcomes(outcomes);
        info!(
            success_count = report.success_count,
            fail_count = report.fail_count,
            total_synced = report.total_synced,
            "order sync pass finished"
        );

        self.persist_report(&report).await;
        Ok(report)
    }

    /// Sync one target over `window`. Never fails.
    #[instrument(skip_all, fields(sync_target = %target))]
    pub async fn sync_target(&self, target: ChannelTarget, window: &SyncWindow) -> SyncOutcome {
        let request = SyncOrdersRequest::new(&target, window);
        debug!(
            channel = %request.channel,
            start_date = %request.start_date,
            end_date = %request.end_date,
            "calling channel adapter"
        );

        let result = SyncResult::from_adapter(self.adapter.sync_orders(&request).await);

        if result.success {
            info!(synced = ?result.synced_count, "channel sync succeeded");
        } else {
            warn!(failure = ?result.failure, message = %result.message, "channel sync failed");
        }

        SyncOutcome::new(target, result)
    }

    /// Best-effort audit log write; failures are logged and dropped.
    async fn persist_report(&self, report: &SyncReport) {
        let entry = SyncLogEntry::from_report(&self.log_action, report, self.clock.now());
        if let Err(err) = self.log.append(&entry).await {
            warn!(error = %err, "failed to persist sync log entry");
        }
    }
}

#[async_trait]
impl SingleChannelSync for OrderSyncService {
    async fn sync_channel(&self, target: &ChannelTarget, lookback_days: i64) -> SyncOutcome {
        let window = self.current_window(lookback_days);
        self.sync_target(target.clone(), &window).await
    }
}

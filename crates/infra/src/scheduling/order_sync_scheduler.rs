//! Cron scheduler for the recurring multi-channel order sync pass.
//!
//! Join handles are tracked, cancellation is explicit, and every asynchronous
//! operation is wrapped in a timeout. A pass that is already running when the
//! scheduler stops is allowed to finish.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ordersync_core::OrderSyncService;
//! use ordersync_infra::scheduling::{OrderSyncScheduler, OrderSyncSchedulerConfig, SchedulerResult};
//!
//! # async fn example(service: Arc<OrderSyncService>) -> SchedulerResult<()> {
//! let mut scheduler = OrderSyncScheduler::with_config(
//!     OrderSyncSchedulerConfig {
//!         cron_expression: "0 */30 * * * *".into(), // every 30 minutes
//!         ..Default::default()
//!     },
//!     service,
//! );
//!
//! scheduler.start().await?;
//! // ... application runs ...
//! scheduler.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use ordersync_core::OrderSyncService;
use ordersync_domain::constants::DEFAULT_SYNC_CRON;
use ordersync_domain::SyncConfig;
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// Configuration for the order sync scheduler.
#[derive(Debug, Clone)]
pub struct OrderSyncSchedulerConfig {
    /// Cron expression (with seconds field) describing the schedule.
    pub cron_expression: String,
    /// Timeout applied to a single pass.
    pub job_timeout: Duration,
    /// Timeout for starting the underlying scheduler.
    pub start_timeout: Duration,
    /// Timeout for stopping the scheduler.
    pub stop_timeout: Duration,
}

impl Default for OrderSyncSchedulerConfig {
    fn default() -> Self {
        Self {
            cron_expression: DEFAULT_SYNC_CRON.into(),
            job_timeout: Duration::from_secs(900),
            start_timeout: Duration::from_secs(5),
            stop_timeout: Duration::from_secs(5),
        }
    }
}

impl From<&SyncConfig> for OrderSyncSchedulerConfig {
    fn from(config: &SyncConfig) -> Self {
        Self {
            cron_expression: config.cron_expression.clone(),
            job_timeout: Duration::from_secs(config.job_timeout_secs),
            ..Default::default()
        }
    }
}

/// Order sync scheduler with explicit lifecycle management.
pub struct OrderSyncScheduler {
    scheduler: Option<JobScheduler>,
    config: OrderSyncSchedulerConfig,
    cancellation: CancellationToken,
    service: Arc<OrderSyncService>,
}

impl OrderSyncScheduler {
    /// Create a scheduler with the default configuration.
    pub fn new(service: Arc<OrderSyncService>) -> Self {
        Self::with_config(OrderSyncSchedulerConfig::default(), service)
    }

    /// Create a scheduler with a custom configuration.
    pub fn with_config(config: OrderSyncSchedulerConfig, service: Arc<OrderSyncService>) -> Self {
        Self { scheduler: None, config, cancellation: CancellationToken::new(), service }
    }

    /// Start the scheduler and register the pass job.
    #[instrument(skip(self), fields(cron = %self.config.cron_expression))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        self.cancellation = CancellationToken::new();

        let scheduler_instance = self.build_scheduler().await?;
        let start_timeout = self.config.start_timeout;

        tokio::time::timeout(start_timeout, scheduler_instance.start())
            .await
            .map_err(|source| SchedulerError::Timeout { duration: start_timeout, source })?
            .map_err(|source| SchedulerError::StartFailed { source })?;

        self.scheduler = Some(scheduler_instance);
        info!("Order sync scheduler started");
        Ok(())
    }

    /// Stop the scheduler. Passes already running are not interrupted.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        let Some(mut scheduler) = self.scheduler.take() else {
            return Err(SchedulerError::NotRunning);
        };

        self.cancellation.cancel();

        let stop_timeout = self.config.stop_timeout;
        tokio::time::timeout(stop_timeout, async move { scheduler.shutdown().await })
            .await
            .map_err(|source| SchedulerError::Timeout { duration: stop_timeout, source })?
            .map_err(|source| SchedulerError::StopFailed { source })?;

        info!("Order sync scheduler stopped");
        Ok(())
    }

    /// Returns true when a scheduler instance is active.
    pub fn is_running(&self) -> bool {
        self.scheduler.is_some()
    }

    async fn build_scheduler(&self) -> SchedulerResult<JobScheduler> {
        let scheduler =
            JobScheduler::new().await.map_err(|source| SchedulerError::CreationFailed { source })?;
        let service = self.service.clone();
        let cancel = self.cancellation.clone();
        let job_timeout = self.config.job_timeout;
        let cron_expr = self.config.cron_expression.clone();

        let job_definition = Job::new_async(cron_expr.as_str(), move |_id, _lock| {
            let service = service.clone();
            let cancel = cancel.clone();

            Box::pin(async move {
                if cancel.is_cancelled() {
                    debug!("Scheduler cancelled; skipping order sync pass");
                    return;
                }
                Self::run_job(&service, job_timeout).await;
            })
        })
        .map_err(|source| SchedulerError::JobRegistrationFailed { source })?;

        let job_id = job_definition.guid();
        scheduler
            .add(job_definition)
            .await
            .map_err(|source| SchedulerError::JobRegistrationFailed { source })?;

        debug!(cron = %self.config.cron_expression, job_id = %job_id, "Registered order sync job");
        Ok(scheduler)
    }

    async fn run_job(service: &OrderSyncService, job_timeout: Duration) {
        let started = Instant::now();

        match tokio::time::timeout(job_timeout, service.run_pass()).await {
            Ok(Ok(report)) => {
                info!(
                    success_count = report.success_count,
                    fail_count = report.fail_count,
                    total_synced = report.total_synced,
                    elapsed = ?started.elapsed(),
                    "Scheduled order sync finished"
                );
            }
            Ok(Err(err)) => {
                error!(error = %err, "Scheduled order sync aborted");
            }
            Err(_) => {
                warn!(timeout_secs = job_timeout.as_secs(), "Scheduled order sync timed out");
            }
        }
    }
}

impl Drop for OrderSyncScheduler {
    fn drop(&mut self) {
        if self.is_running() {
            warn!("OrderSyncScheduler dropped while running; cancelling jobs");
            self.cancellation.cancel();
        }
    }
}

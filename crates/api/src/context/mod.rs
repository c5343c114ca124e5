//! Application context - dependency injection container

use std::sync::Arc;

use ordersync_core::{AutoSyncStore, ChannelSyncPort, OrderSyncService};
use ordersync_domain::{ChannelTarget, Config, OrderSyncError, Result};
use ordersync_infra::scheduling::{
    AutoSyncScheduler, OrderSyncScheduler, OrderSyncSchedulerConfig, SchedulerError,
};
use ordersync_infra::{
    DbManager, FileAutoSyncStore, HttpChannelSyncClient, SqliteCredentialRegistry,
    SqliteSyncLogRepository,
};
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::utils::health::{ComponentHealth, HealthStatus};

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub registry: Arc<SqliteCredentialRegistry>,
    pub sync_logs: Arc<SqliteSyncLogRepository>,
    pub order_sync: Arc<OrderSyncService>,

    // Schedulers
    pub order_sync_scheduler: Mutex<OrderSyncScheduler>,
    pub auto_sync: Arc<AutoSyncScheduler>,
}

impl AppContext {
    /// Build the context from configuration.
    ///
    /// Opens the database and runs migrations, but starts no background work;
    /// call [`AppContext::start`] for that.
    pub async fn new(config: Config) -> Result<Self> {
        let adapter = Arc::new(HttpChannelSyncClient::from_config(&config.adapter)?);
        let store = Arc::new(FileAutoSyncStore::new(&config.auto_sync.state_dir));
        Self::with_parts(config, adapter, store).await
    }

    /// Build the context with an explicit adapter and state store.
    ///
    /// Tests use this to avoid the network and the filesystem.
    pub async fn with_parts(
        config: Config,
        adapter: Arc<dyn ChannelSyncPort>,
        store: Arc<dyn AutoSyncStore>,
    ) -> Result<Self> {
        config.validate()?;
        let timezone = config.sync.timezone()?;

        let db = {
            let path = config.database.path.clone();
            let pool_size = config.database.pool_size;
            tokio::task::spawn_blocking(move || {
                let db = DbManager::new(&path, pool_size)?;
                db.run_migrations()?;
                Ok::<_, OrderSyncError>(db)
            })
            .await
            .map_err(|e| OrderSyncError::Internal(format!("database init task failed: {e}")))??
        };
        let db = Arc::new(db);

        let registry = Arc::new(SqliteCredentialRegistry::new(db.clone()));
        let sync_logs = Arc::new(SqliteSyncLogRepository::new(db.clone()));

        let order_sync = Arc::new(
            OrderSyncService::new(registry.clone(), adapter, sync_logs.clone())
                .with_timezone(timezone),
        );

        let order_sync_scheduler = OrderSyncScheduler::with_config(
            OrderSyncSchedulerConfig::from(&config.sync),
            order_sync.clone(),
        );

        let auto_sync_target = ChannelTarget::default_account(config.auto_sync.channel);
        let auto_sync = Arc::new(
            AutoSyncScheduler::builder(order_sync.clone(), store, auto_sync_target)
                .on_success(|result| {
                    info!(synced = ?result.synced_count, "auto-sync refreshed orders");
                })
                .build(),
        );

        info!(
            database = %db.path().display(),
            auto_sync_channel = %config.auto_sync.channel,
            "application context initialised"
        );

        Ok(Self {
            config,
            db,
            registry,
            sync_logs,
            order_sync,
            order_sync_scheduler: Mutex::new(order_sync_scheduler),
            auto_sync,
        })
    }

    /// Start background work: the cron pass (when enabled) and the auto-sync
    /// timer (when its persisted flag is on).
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<()> {
        if self.config.sync.enabled {
            self.order_sync_scheduler.lock().await.start().await?;
        } else {
            info!("scheduled order sync disabled by configuration");
        }

        self.auto_sync.start();
        Ok(())
    }

    /// Stop background work. Safe to call more than once.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<()> {
        info!("shutdown called on AppContext");

        {
            let mut scheduler = self.order_sync_scheduler.lock().await;
            if scheduler.is_running() {
                scheduler.stop().await?;
            }
        }

        match self.auto_sync.stop().await {
            Ok(()) | Err(SchedulerError::NotRunning) => {}
            Err(err) => warn!(error = %err, "auto-sync scheduler did not stop cleanly"),
        }

        Ok(())
    }

    /// Check health of all application components.
    pub async fn health_check(&self) -> HealthStatus {
        let database = self.check_database_health().await;

        let cron_running = self.order_sync_scheduler.lock().await.is_running();
        let scheduler = if cron_running || !self.config.sync.enabled {
            ComponentHealth::healthy("order_sync_scheduler")
        } else {
            ComponentHealth::unhealthy("order_sync_scheduler", "not running")
        };

        let auto_sync = ComponentHealth::from_last_auto_sync(
            self.auto_sync.state().last_result.as_ref(),
        );

        HealthStatus::from_components(vec![database, scheduler, auto_sync])
    }

    /// Check database health without blocking the async runtime.
    async fn check_database_health(&self) -> ComponentHealth {
        let db = self.db.clone();
        match tokio::task::spawn_blocking(move || db.health_check()).await {
            Ok(Ok(())) => ComponentHealth::healthy("database"),
            Ok(Err(e)) => {
                warn!(error = %e, "database health check failed");
                ComponentHealth::unhealthy("database", format!("query failed: {e}"))
            }
            Err(e) => {
                tracing::error!(error = %e, "database health check task panicked");
                ComponentHealth::unhealthy("database", format!("task panic: {e}"))
            }
        }
    }
}

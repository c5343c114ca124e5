//! Auto-sync scheduler for a single channel.
//!
//! Keeps one channel fresh while the process runs: it fires immediately when
//! the last sync is older than [`AUTO_SYNC_INTERVAL`], then repeats on that
//! interval. Manual triggers share the same re-entrancy guard, so at most one
//! sync is in flight and overlapping triggers are dropped rather than queued.
//!
//! The enabled flag and the last sync time survive restarts through an
//! [`AutoSyncStore`]. Storage failures never stop the scheduler.
//!
//! Timer methods (`start`, `configure`) spawn onto the current Tokio runtime.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use ordersync_core::{AutoSyncStore, Clock, SingleChannelSync, SystemClock};
use ordersync_domain::constants::{AUTO_SYNC_INTERVAL, LOOKBACK_DAYS};
use ordersync_domain::{AutoSyncState, ChannelTarget, PersistedAutoSync, SyncResult};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// Invoked after every successful trigger.
pub type SuccessCallback = Arc<dyn Fn(&SyncResult) + Send + Sync>;

const JOIN_TIMEOUT: Duration = Duration::from_secs(30);

struct TimerHandle {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

struct Inner {
    sync: Arc<dyn SingleChannelSync>,
    store: Arc<dyn AutoSyncStore>,
    clock: Arc<dyn Clock>,
    target: ChannelTarget,
    state: Mutex<AutoSyncState>,
    in_flight: AtomicBool,
    on_success: Option<SuccessCallback>,
}

/// Releases the re-entrancy guard and clears `is_syncing` on every exit path.
struct SyncGuard<'a> {
    inner: &'a Inner,
}

impl<'a> SyncGuard<'a> {
    fn acquire(inner: &'a Inner) -> Option<Self> {
        inner
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { inner })
    }
}

impl Drop for SyncGuard<'_> {
    fn drop(&mut self) {
        self.inner.state.lock().is_syncing = false;
        self.inner.in_flight.store(false, Ordering::Release);
    }
}

impl Inner {
    async fn trigger(&self) -> Option<SyncResult> {
        let Some(_guard) = SyncGuard::acquire(self) else {
            debug!(sync_target = %self.target, "auto-sync already in flight; trigger dropped");
            return None;
        };

        let started_at = self.clock.now();
        self.state.lock().is_syncing = true;

        let result = self.sync.sync_channel(&self.target, LOOKBACK_DAYS).await.result;

        let persisted = {
            let mut state = self.state.lock();
            state.last_sync_at = Some(started_at);
            state.last_result = Some(result.clone());
            state.persisted()
        };
        self.persist(&persisted);

        if result.success {
            info!(sync_target = %self.target, synced = ?result.synced_count, "auto-sync succeeded");
            if let Some(callback) = &self.on_success {
                callback(&result);
            }
        } else {
            warn!(sync_target = %self.target, message = %result.message, "auto-sync failed");
        }

        Some(result)
    }

    fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.state.lock().last_sync_at {
            None => true,
            Some(last) => (now - last).to_std().map_or(false, |age| age >= AUTO_SYNC_INTERVAL),
        }
    }

    fn persist(&self, persisted: &PersistedAutoSync) {
        if let Err(err) = self.store.save(persisted) {
            warn!(error = %err, "failed to persist auto-sync state");
        }
    }

    async fn run_timer(self: Arc<Self>, cancel: CancellationToken) {
        if self.is_due(self.clock.now()) {
            debug!(sync_target = %self.target, "auto-sync overdue; firing immediately");
            self.trigger().await;
        }

        let mut ticker = interval_at(Instant::now() + AUTO_SYNC_INTERVAL, AUTO_SYNC_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    self.trigger().await;
                }
            }
        }

        debug!(sync_target = %self.target, "auto-sync timer stopped");
    }
}

/// Builder for [`AutoSyncScheduler`].
pub struct AutoSyncSchedulerBuilder {
    sync: Arc<dyn SingleChannelSync>,
    store: Arc<dyn AutoSyncStore>,
    target: ChannelTarget,
    clock: Arc<dyn Clock>,
    on_success: Option<SuccessCallback>,
}

impl AutoSyncSchedulerBuilder {
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Callback run after each successful trigger, e.g. to refresh a view.
    pub fn on_success(mut self, callback: impl Fn(&SyncResult) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(callback));
        self
    }

    /// Restore persisted state and build the scheduler. The timer is not
    /// armed until [`AutoSyncScheduler::start`].
    pub fn build(self) -> AutoSyncScheduler {
        let persisted = match self.store.load() {
            Ok(Some(persisted)) => persisted,
            Ok(None) => PersistedAutoSync::default(),
            Err(err) => {
                warn!(error = %err, "auto-sync state unreadable; using defaults");
                PersistedAutoSync::default()
            }
        };

        AutoSyncScheduler {
            inner: Arc::new(Inner {
                sync: self.sync,
                store: self.store,
                clock: self.clock,
                target: self.target,
                state: Mutex::new(AutoSyncState::restored(&persisted)),
                in_flight: AtomicBool::new(false),
                on_success: self.on_success,
            }),
            timer: Mutex::new(None),
        }
    }
}

/// Interval-driven sync of one channel with persisted enable/last-run state.
pub struct AutoSyncScheduler {
    inner: Arc<Inner>,
    timer: Mutex<Option<TimerHandle>>,
}

impl AutoSyncScheduler {
    pub fn builder(
        sync: Arc<dyn SingleChannelSync>,
        store: Arc<dyn AutoSyncStore>,
        target: ChannelTarget,
    ) -> AutoSyncSchedulerBuilder {
        AutoSyncSchedulerBuilder {
            sync,
            store,
            target,
            clock: Arc::new(SystemClock),
            on_success: None,
        }
    }

    /// Arm the timer if auto-sync is enabled, firing right away when overdue.
    #[instrument(skip(self), fields(sync_target = %self.inner.target))]
    pub fn start(&self) {
        if self.inner.state.lock().enabled {
            self.arm();
        } else {
            info!("auto-sync disabled; timer not armed");
        }
    }

    /// Enable or disable auto-sync. The flag is persisted immediately.
    #[instrument(skip(self), fields(sync_target = %self.inner.target))]
    pub fn configure(&self, enabled: bool) {
        let persisted = {
            let mut state = self.inner.state.lock();
            state.enabled = enabled;
            state.persisted()
        };
        self.inner.persist(&persisted);

        if enabled {
            self.arm();
        } else {
            self.disarm();
        }
        info!(enabled, "auto-sync configured");
    }

    /// Sync the configured channel now, regardless of the timer.
    ///
    /// Returns `None` when another sync is already in flight.
    pub async fn trigger_now(&self) -> Option<SyncResult> {
        self.inner.trigger().await
    }

    /// Snapshot of the observable state.
    pub fn state(&self) -> AutoSyncState {
        self.inner.state.lock().clone()
    }

    pub fn target(&self) -> &ChannelTarget {
        &self.inner.target
    }

    /// True while the recurring timer is armed.
    pub fn is_armed(&self) -> bool {
        self.timer.lock().as_ref().is_some_and(|timer| !timer.cancel.is_cancelled())
    }

    /// Cancel the timer and wait for its task. A sync already in flight runs
    /// to completion first.
    pub async fn stop(&self) -> SchedulerResult<()> {
        let Some(timer) = self.timer.lock().take() else {
            return Err(SchedulerError::NotRunning);
        };

        timer.cancel.cancel();
        tokio::time::timeout(JOIN_TIMEOUT, timer.handle)
            .await
            .map_err(|source| SchedulerError::Timeout { duration: JOIN_TIMEOUT, source })??;

        info!(sync_target = %self.inner.target, "auto-sync scheduler stopped");
        Ok(())
    }

    fn arm(&self) {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(self.inner.clone().run_timer(cancel.clone()));

        if let Some(previous) = self.timer.lock().replace(TimerHandle { cancel, handle }) {
            previous.cancel.cancel();
        }
        debug!(sync_target = %self.inner.target, "auto-sync timer armed");
    }

    fn disarm(&self) {
        if let Some(timer) = self.timer.lock().take() {
            timer.cancel.cancel();
        }
    }
}

impl Drop for AutoSyncScheduler {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.get_mut().take() {
            timer.cancel.cancel();
        }
    }
}

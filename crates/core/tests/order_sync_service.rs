//! Integration tests for the order sync orchestrator

mod support;

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use ordersync_core::{OrderSyncService, SingleChannelSync};
use ordersync_domain::{
    AdapterError, Channel, ChannelTarget, FailureKind, LogStatus, OrderSyncError,
    SyncOrdersResponse,
};
use support::adapters::{synced, ScriptedChannelAdapter};
use support::clock::FixedClock;
use support::repositories::{row, MockCredentialRegistry, MockSyncLogRepository, UnfilteredRegistry};

/// 2024-05-10 01:00 in Seoul, still 2024-05-09 in UTC.
fn seoul_morning() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2024, 5, 9, 16, 0, 0).unwrap())
}

fn service(
    registry: MockCredentialRegistry,
    adapter: &ScriptedChannelAdapter,
    log: &MockSyncLogRepository,
) -> OrderSyncService {
    OrderSyncService::new(Arc::new(registry), Arc::new(adapter.clone()), Arc::new(log.clone()))
        .with_clock(Arc::new(seoul_morning()))
}

#[tokio::test]
async fn no_targets_means_no_calls_and_no_log() {
    let adapter = ScriptedChannelAdapter::new();
    let log = MockSyncLogRepository::new();
    let service = service(MockCredentialRegistry::new(vec![]), &adapter, &log);

    let report = service.run_pass().await.unwrap();

    assert_eq!((report.success_count, report.fail_count, report.total_synced), (0, 0, 0));
    assert!(report.outcomes.is_empty());
    assert_eq!(report.message, "No active channel credentials to sync");
    assert_eq!(adapter.call_count(), 0);
    assert!(log.entries().is_empty());
}

#[tokio::test]
async fn mixed_pass_reports_each_target_and_logs_partial() {
    let adapter = ScriptedChannelAdapter::new()
        .respond("smartstore", None, synced(12))
        .respond("cafe24", Some("B2"), Err(AdapterError::Transport("operation timed out".into())));
    let log = MockSyncLogRepository::new();
    let registry = MockCredentialRegistry::new(vec![
        row("naver_smartstore", None),
        row("cafe24", Some("B2")),
    ]);

    let report = service(registry, &adapter, &log).run_pass().await.unwrap();

    assert_eq!(report.success_count, 1);
    assert_eq!(report.fail_count, 1);
    assert_eq!(report.total_synced, 12);
    assert_eq!(report.outcomes.len(), 2);

    let first = &report.outcomes[0];
    assert_eq!(first.target, ChannelTarget::new(Channel::SmartStore, None));
    assert!(first.is_success());
    assert_eq!(first.result.synced_count, Some(12));

    let second = &report.outcomes[1];
    assert_eq!(second.target, ChannelTarget::new(Channel::Cafe24, Some("B2".into())));
    assert!(!second.is_success());
    assert!(second.result.message.starts_with("error:"));
    assert_eq!(second.result.failure, Some(FailureKind::Transport));

    let entries = log.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].status, LogStatus::Partial);
    assert_eq!(entries[0].action, "scheduled-order-sync");
    assert_eq!(entries[0].message, report.message);
    assert_eq!(entries[0].details, report.outcomes);
}

#[tokio::test]
async fn one_failure_does_not_stop_later_targets() {
    let adapter = ScriptedChannelAdapter::new()
        .respond("smartstore", None, Err(AdapterError::http(500, "boom")))
        .respond("cafe24", None, synced(3))
        .respond("coupang", None, synced(4));
    let log = MockSyncLogRepository::new();
    let registry = MockCredentialRegistry::new(vec![
        row("naver_smartstore", None),
        row("cafe24", None),
        row("coupang", None),
    ]);

    let report = service(registry, &adapter, &log).run_pass().await.unwrap();

    assert_eq!(adapter.call_count(), 3);
    assert_eq!((report.success_count, report.fail_count, report.total_synced), (2, 1, 7));
    let order: Vec<_> = adapter.requests().into_iter().map(|r| r.channel).collect();
    assert_eq!(order, ["smartstore", "cafe24", "coupang"]);
}

#[tokio::test]
async fn http_error_message_carries_status_and_body() {
    let adapter = ScriptedChannelAdapter::new()
        .respond("coupang", None, Err(AdapterError::http(404, "Not Found")));
    let log = MockSyncLogRepository::new();
    let registry = MockCredentialRegistry::new(vec![row("coupang", None)]);

    let report = service(registry, &adapter, &log).run_pass().await.unwrap();

    let outcome = &report.outcomes[0];
    assert_eq!(outcome.result.message, "HTTP 404: Not Found");
    assert_eq!(outcome.result.failure, Some(FailureKind::Http));
    assert_eq!(report.fail_count, 1);
}

#[tokio::test]
async fn soft_failure_without_detail_uses_fallback() {
    let adapter =
        ScriptedChannelAdapter::new().respond("cafe24", None, Ok(SyncOrdersResponse::default()));
    let log = MockSyncLogRepository::new();
    let registry = MockCredentialRegistry::new(vec![row("cafe24", None)]);

    let report = service(registry, &adapter, &log).run_pass().await.unwrap();

    assert_eq!(report.outcomes[0].result.message, "sync failed");
    assert_eq!(report.outcomes[0].result.failure, Some(FailureKind::Soft));
}

#[tokio::test]
async fn all_success_logs_success_status() {
    let adapter = ScriptedChannelAdapter::new()
        .respond("smartstore", None, synced(0))
        .respond("coupang", None, Ok(SyncOrdersResponse { success: Some(true), ..Default::default() }));
    let log = MockSyncLogRepository::new();
    let registry =
        MockCredentialRegistry::new(vec![row("naver_smartstore", None), row("coupang", None)]);

    let report = service(registry, &adapter, &log).run_pass().await.unwrap();

    assert_eq!((report.success_count, report.fail_count, report.total_synced), (2, 0, 0));
    assert_eq!(report.outcomes[0].result.synced_count, Some(0));
    assert_eq!(report.outcomes[1].result.synced_count, None);
    assert_eq!(log.entries()[0].status, LogStatus::Success);
}

#[tokio::test]
async fn log_write_failure_does_not_fail_the_pass() {
    let adapter = ScriptedChannelAdapter::new().respond("smartstore", None, synced(5));
    let log = MockSyncLogRepository::failing();
    let registry = MockCredentialRegistry::new(vec![row("naver_smartstore", None)]);

    let report = service(registry, &adapter, &log).run_pass().await.unwrap();

    assert_eq!(report.total_synced, 5);
    assert!(log.entries().is_empty());
}

#[tokio::test]
async fn registry_failure_aborts_without_logging() {
    let adapter = ScriptedChannelAdapter::new();
    let log = MockSyncLogRepository::new();
    let registry =
        MockCredentialRegistry::failing(OrderSyncError::Database("connection refused".into()));

    let err = service(registry, &adapter, &log).run_pass().await.unwrap_err();

    assert!(matches!(err, OrderSyncError::Registry(_)));
    assert_eq!(adapter.call_count(), 0);
    assert!(log.entries().is_empty());
}

#[tokio::test]
async fn window_is_three_days_back_from_today_in_seoul() {
    let adapter = ScriptedChannelAdapter::new();
    let log = MockSyncLogRepository::new();
    let registry = MockCredentialRegistry::new(vec![row("cafe24", Some("B2"))]);

    service(registry, &adapter, &log).run_pass().await.unwrap();

    let request = &adapter.requests()[0];
    assert_eq!(request.action, "sync-orders");
    assert_eq!(request.channel, "cafe24");
    assert_eq!(request.start_date, "2024-05-07");
    assert_eq!(request.end_date, "2024-05-10");
    assert_eq!(request.sub_account_id.as_deref(), Some("B2"));
}

#[tokio::test]
async fn window_follows_configured_timezone() {
    let adapter = ScriptedChannelAdapter::new();
    let log = MockSyncLogRepository::new();
    let registry = MockCredentialRegistry::new(vec![row("coupang", None)]);

    service(registry, &adapter, &log)
        .with_timezone(chrono_tz::UTC)
        .run_pass()
        .await
        .unwrap();

    let request = &adapter.requests()[0];
    assert_eq!(request.start_date, "2024-05-06");
    assert_eq!(request.end_date, "2024-05-09");
}

#[tokio::test]
async fn unsupported_and_inactive_rows_are_skipped() {
    let adapter = ScriptedChannelAdapter::new();
    let log = MockSyncLogRepository::new();
    let mut inactive = row("cafe24", None);
    inactive.is_active = false;
    let registry = UnfilteredRegistry(vec![row("gmarket", None), inactive, row("coupang", None)]);

    let service = OrderSyncService::new(
        Arc::new(registry),
        Arc::new(adapter.clone()),
        Arc::new(log.clone()),
    )
    .with_clock(Arc::new(seoul_morning()));
    let report = service.run_pass().await.unwrap();

    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(adapter.requests()[0].channel, "coupang");
}

#[tokio::test]
async fn custom_log_action_is_recorded() {
    let adapter = ScriptedChannelAdapter::new();
    let log = MockSyncLogRepository::new();
    let registry = MockCredentialRegistry::new(vec![row("coupang", None)]);

    service(registry, &adapter, &log).with_log_action("manual-order-sync").run_pass().await.unwrap();

    assert_eq!(log.entries()[0].action, "manual-order-sync");
}

#[tokio::test]
async fn sync_channel_uses_requested_lookback() {
    let adapter = ScriptedChannelAdapter::new().respond("smartstore", None, synced(9));
    let log = MockSyncLogRepository::new();
    let service = service(MockCredentialRegistry::default(), &adapter, &log);

    let outcome = service.sync_channel(&ChannelTarget::default_account(Channel::SmartStore), 1).await;

    assert!(outcome.is_success());
    assert_eq!(outcome.result.synced_count, Some(9));
    let request = &adapter.requests()[0];
    assert_eq!(request.start_date, "2024-05-09");
    assert_eq!(request.end_date, "2024-05-10");
    assert!(log.entries().is_empty());
}

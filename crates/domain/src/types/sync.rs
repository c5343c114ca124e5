//! Sync pass types: adapter wire contract, outcomes, reports and log entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::channel::ChannelTarget;
use super::window::SyncWindow;
use crate::constants::{
    NO_TARGETS_MESSAGE, SOFT_FAILURE_FALLBACK, SYNC_ORDERS_ACTION, TRANSPORT_ERROR_PREFIX,
};
use crate::errors::AdapterError;
use crate::impl_domain_status_conversions;

// ============================================================================
// Adapter wire contract
// ============================================================================

/// Body of the `sync-orders` call sent to a channel adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOrdersRequest {
    pub action: String,
    /// Adapter-side channel identifier.
    pub channel: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_account_id: Option<String>,
}

impl SyncOrdersRequest {
    pub fn new(target: &ChannelTarget, window: &SyncWindow) -> Self {
        Self {
            action: SYNC_ORDERS_ACTION.to_string(),
            channel: target.channel.adapter_id().to_string(),
            start_date: window.start_param(),
            end_date: window.end_param(),
            sub_account_id: target.sub_account_id.clone(),
        }
    }
}

/// Body returned by a channel adapter on a 2xx status.
///
/// Only an explicit `success: true` counts as success; a missing or `null`
/// flag is a soft failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOrdersResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synced: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Outcomes
// ============================================================================

/// Why a single channel sync failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Non-2xx status from the adapter.
    Http,
    /// Well-formed response reporting `success: false`.
    Soft,
    /// Network failure or undecodable body.
    Transport,
}

impl_domain_status_conversions!(FailureKind {
    Http => "http",
    Soft => "soft",
    Transport => "transport",
});

/// Result of one channel sync, independent of which target it was for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synced_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
}

impl SyncResult {
    pub fn succeeded(message: impl Into<String>, synced_count: Option<u64>) -> Self {
        Self { success: true, message: message.into(), synced_count, failure: None }
    }

    pub fn failed(kind: FailureKind, message: impl Into<String>) -> Self {
        Self { success: false, message: message.into(), synced_count: None, failure: Some(kind) }
    }

    /// Classify whatever came back from the adapter boundary.
    ///
    /// - `Err(Http)` keeps the `HTTP {status}: {body}` form.
    /// - `Err(Transport | Decode)` gets the `error:` marker.
    /// - `Ok` without `success` is a soft failure: `error`, then `message`,
    ///   then the generic fallback.
    pub fn from_adapter(result: std::result::Result<SyncOrdersResponse, AdapterError>) -> Self {
        match result {
            Ok(response) if response.success == Some(true) => {
                let message = response.message.unwrap_or_else(|| match response.synced {
                    Some(count) => format!("synced {count} orders"),
                    None => "sync completed".to_string(),
                });
                Self::succeeded(message, response.synced)
            }
            Ok(response) => {
                let message = non_empty(response.error)
                    .or_else(|| non_empty(response.message))
                    .unwrap_or_else(|| SOFT_FAILURE_FALLBACK.to_string());
                Self::failed(FailureKind::Soft, message)
            }
            Err(err @ AdapterError::Http { .. }) => Self::failed(FailureKind::Http, err.to_string()),
            Err(err) => {
                Self::failed(FailureKind::Transport, format!("{TRANSPORT_ERROR_PREFIX} {err}"))
            }
        }
    }

    /// Orders this result contributes to a pass total.
    pub fn contributed_count(&self) -> u64 {
        if self.success {
            self.synced_count.unwrap_or(0)
        } else {
            0
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Outcome for one target within one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome {
    pub target: ChannelTarget,
    #[serde(flatten)]
    pub result: SyncResult,
}

impl SyncOutcome {
    pub fn new(target: ChannelTarget, result: SyncResult) -> Self {
        Self { target, result }
    }

    pub fn is_success(&self) -> bool {
        self.result.success
    }
}

// ============================================================================
// Reports and audit log
// ============================================================================

/// Aggregate of one orchestrator pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub outcomes: Vec<SyncOutcome>,
    pub success_count: usize,
    pub fail_count: usize,
    pub total_synced: u64,
    pub message: String,
}

impl SyncReport {
    /// Report for a pass that found nothing to sync.
    pub fn empty() -> Self {
        Self {
            outcomes: Vec::new(),
            success_count: 0,
            fail_count: 0,
            total_synced: 0,
            message: NO_TARGETS_MESSAGE.to_string(),
        }
    }

    /// Fold outcomes (kept in the given order) into counts and a summary.
    pub fn from_outcomes(outcomes: Vec<SyncOutcome>) -> Self {
        let (success_count, fail_count, total_synced) =
            outcomes.iter().fold((0usize, 0usize, 0u64), |(ok, failed, total), outcome| {
                if outcome.is_success() {
                    (ok + 1, failed, total + outcome.result.contributed_count())
                } else {
                    (ok, failed + 1, total)
                }
            });

        let message = format!(
            "Order sync complete: {success_count} succeeded, {fail_count} failed, \
             {total_synced} orders synced"
        );

        Self { outcomes, success_count, fail_count, total_synced, message }
    }

    pub fn status(&self) -> LogStatus {
        if self.fail_count == 0 {
            LogStatus::Success
        } else {
            LogStatus::Partial
        }
    }
}

/// Status column of an audit log row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    Success,
    Partial,
}

impl_domain_status_conversions!(LogStatus {
    Success => "success",
    Partial => "partial",
});

/// One audit log row per pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncLogEntry {
    pub id: Uuid,
    pub action: String,
    pub status: LogStatus,
    pub message: String,
    pub details: Vec<SyncOutcome>,
    pub created_at: DateTime<Utc>,
}

impl SyncLogEntry {
    pub fn from_report(action: &str, report: &SyncReport, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            action: action.to_string(),
            status: report.status(),
            message: report.message.clone(),
            details: report.outcomes.clone(),
            created_at,
        }
    }
}

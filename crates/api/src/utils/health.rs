//! Health report for `get_app_health`

use chrono::{DateTime, Utc};
use ordersync_domain::SyncResult;
use serde::{Deserialize, Serialize};

/// Health of the running application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// True only when every component is healthy.
    pub is_healthy: bool,
    pub checked_at: DateTime<Utc>,
    pub components: Vec<ComponentHealth>,
}

impl HealthStatus {
    pub fn from_components(components: Vec<ComponentHealth>) -> Self {
        let is_healthy = components.iter().all(|c| c.is_healthy);
        Self { is_healthy, checked_at: Utc::now(), components }
    }

    /// Component by name, if it was checked.
    pub fn component(&self, name: &str) -> Option<&ComponentHealth> {
        self.components.iter().find(|c| c.name == name)
    }
}

/// Health of one component (`database`, `order_sync_scheduler`, `auto_sync`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub name: String,
    pub is_healthy: bool,
    pub message: Option<String>,
}

impl ComponentHealth {
    pub fn healthy(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: true, message: None }
    }

    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: false, message: Some(message.into()) }
    }

    /// Auto-sync is unhealthy while its last trigger failed. No trigger yet
    /// counts as healthy.
    pub fn from_last_auto_sync(last_result: Option<&SyncResult>) -> Self {
        match last_result {
            Some(result) if !result.success => Self::unhealthy("auto_sync", result.message.clone()),
            _ => Self::healthy("auto_sync"),
        }
    }
}

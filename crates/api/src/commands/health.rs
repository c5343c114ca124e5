//! Health check command for monitoring

use std::sync::Arc;

use crate::context::AppContext;
use crate::utils::health::HealthStatus;

/// Get application health status
///
/// # Example Response
/// ```json
/// {
///   "is_healthy": true,
///   "checked_at": "2024-05-10T03:00:00Z",
///   "components": [
///     { "name": "database", "is_healthy": true, "message": null },
///     { "name": "order_sync_scheduler", "is_healthy": true, "message": null },
///     { "name": "auto_sync", "is_healthy": true, "message": null }
///   ]
/// }
/// ```
pub async fn get_app_health(ctx: &Arc<AppContext>) -> Result<HealthStatus, String> {
    Ok(ctx.health_check().await)
}

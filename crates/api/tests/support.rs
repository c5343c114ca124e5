#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use ordersync_domain::{Channel, Config};
use ordersync_lib::AppContext;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ADAPTER_PATH: &str = "/functions/v1/marketplace-api";

/// Context wired against a temporary database, a temporary state directory
/// and a mock channel adapter.
pub struct TestContext {
    pub ctx: Arc<AppContext>,
    pub adapter: MockServer,
    _temp_dir: TempDir,
    state_dir: PathBuf,
}

impl TestContext {
    /// Path of the persisted auto-sync state file.
    pub fn state_file(&self) -> PathBuf {
        self.state_dir.join("order-auto-sync.json")
    }
}

/// Config pointing every external dependency into `temp_dir` or `adapter`.
pub fn test_config(temp_dir: &TempDir, adapter: &MockServer) -> Config {
    let mut config = Config::default();
    config.database.path = temp_dir.path().join("ordersync.db").to_string_lossy().into_owned();
    config.database.pool_size = 2;
    config.adapter.endpoint_url = format!("{}{ADAPTER_PATH}", adapter.uri());
    config.adapter.timeout_secs = 5;
    config.adapter.max_attempts = 1;
    config.auto_sync.channel = Channel::SmartStore;
    config.auto_sync.state_dir = temp_dir.path().join("state").to_string_lossy().into_owned();
    config
}

/// Mount an adapter that reports `synced` orders for every call.
pub async fn mount_success(adapter: &MockServer, synced: u64) {
    Mock::given(method("POST"))
        .and(path(ADAPTER_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "synced": synced })),
        )
        .mount(adapter)
        .await;
}

/// Create a new test context with fresh database and state.
pub async fn setup_test_context() -> TestContext {
    let temp_dir = TempDir::new().expect("failed to create temporary directory");
    let adapter = MockServer::start().await;
    let config = test_config(&temp_dir, &adapter);
    let state_dir = PathBuf::from(&config.auto_sync.state_dir);

    let ctx = AppContext::new(config).await.expect("failed to build AppContext");

    TestContext { ctx: Arc::new(ctx), adapter, _temp_dir: temp_dir, state_dir }
}

//! Durable storage for the auto-sync scheduler record

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use ordersync_core::AutoSyncStore;
use ordersync_domain::constants::AUTO_SYNC_STORAGE_KEY;
use ordersync_domain::{OrderSyncError, PersistedAutoSync, Result};
use parking_lot::Mutex;
use tracing::debug;

/// JSON file at `{state_dir}/order-auto-sync.json`.
///
/// Writes go through a sibling temp file and a rename.
#[derive(Debug, Clone)]
pub struct FileAutoSyncStore {
    path: PathBuf,
}

impl FileAutoSyncStore {
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self { path: state_dir.as_ref().join(format!("{AUTO_SYNC_STORAGE_KEY}.json")) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AutoSyncStore for FileAutoSyncStore {
    fn load(&self) -> Result<Option<PersistedAutoSync>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(OrderSyncError::Storage(format!(
                    "failed to read {}: {err}",
                    self.path.display()
                )))
            }
        };

        serde_json::from_str(&contents).map(Some).map_err(|err| {
            OrderSyncError::Storage(format!("corrupt auto-sync state {}: {err}", self.path.display()))
        })
    }

    fn save(&self, state: &PersistedAutoSync) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|err| {
                OrderSyncError::Storage(format!("failed to create {}: {err}", dir.display()))
            })?;
        }

        let json = serde_json::to_vec_pretty(state)
            .map_err(|err| OrderSyncError::Internal(err.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .and_then(|()| fs::rename(&tmp, &self.path))
            .map_err(|err| {
                OrderSyncError::Storage(format!("failed to write {}: {err}", self.path.display()))
            })?;

        debug!(path = %self.path.display(), "auto-sync state saved");
        Ok(())
    }
}

/// In-process store; state is lost on restart.
#[derive(Debug, Default)]
pub struct MemoryAutoSyncStore {
    state: Mutex<Option<PersistedAutoSync>>,
}

impl MemoryAutoSyncStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `state`.
    pub fn with_state(state: PersistedAutoSync) -> Self {
        Self { state: Mutex::new(Some(state)) }
    }

    /// Last saved record.
    pub fn snapshot(&self) -> Option<PersistedAutoSync> {
        *self.state.lock()
    }
}

impl AutoSyncStore for MemoryAutoSyncStore {
    fn load(&self) -> Result<Option<PersistedAutoSync>> {
        Ok(*self.state.lock())
    }

    fn save(&self, state: &PersistedAutoSync) -> Result<()> {
        *self.state.lock() = Some(*state);
        Ok(())
    }
}

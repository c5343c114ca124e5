//! Local state storage

pub mod auto_sync_store;

pub use auto_sync_store::{FileAutoSyncStore, MemoryAutoSyncStore};

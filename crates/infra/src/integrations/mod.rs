//! External service integrations

pub mod channel_sync;

pub use channel_sync::{HttpChannelSyncClient, RetryPolicy};

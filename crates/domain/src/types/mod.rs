//! Domain types and models

pub mod auto_sync;
pub mod channel;
pub mod sync;
pub mod window;

pub use auto_sync::{AutoSyncState, PersistedAutoSync};
pub use channel::{Channel, ChannelTarget, CredentialRow};
pub use sync::{
    FailureKind, LogStatus, SyncLogEntry, SyncOrdersRequest, SyncOrdersResponse, SyncOutcome,
    SyncReport, SyncResult,
};
pub use window::SyncWindow;

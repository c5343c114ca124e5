//! # OrderSync Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for the credential registry, channel adapters,
//!   the audit log, scheduler state storage and the clock
//! - The sync orchestrator service
//!
//! ## Architecture Principles
//! - Only depends on `ordersync-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod sync;

pub use sync::ports::{
    AutoSyncStore, ChannelSyncPort, Clock, CredentialRegistry, SingleChannelSync,
    SyncLogRepository, SystemClock,
};
pub use sync::OrderSyncService;

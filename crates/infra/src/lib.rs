//! # OrderSync Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - Database implementations (SQLite via r2d2)
//! - The HTTP channel adapter client
//! - Auto-sync state storage
//! - Configuration loading
//! - Cron and interval schedulers
//!
//! ## Architecture
//! - Implements traits defined in `ordersync-core`
//! - Contains all "impure" code (I/O, timers, network)

pub mod config;
pub mod database;
pub mod errors;
pub mod integrations;
pub mod scheduling;
pub mod storage;

// Re-export commonly used items
pub use database::*;
pub use errors::InfraError;
pub use integrations::*;
pub use storage::*;

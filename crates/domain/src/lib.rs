//! # OrderSync Domain
//!
//! Business domain types for multi-channel order synchronization.
//!
//! This crate contains:
//! - Channel identifiers and sync targets
//! - Sync windows, outcomes and pass reports
//! - Auto-sync scheduler state
//! - Domain error types and Result definitions
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other OrderSync crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;

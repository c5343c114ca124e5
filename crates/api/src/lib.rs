//! # OrderSync App
//!
//! Application layer - commands and main entry point.
//!
//! This crate contains:
//! - Commands (operator surface over the sync services)
//! - Application context (dependency injection)
//! - Logging setup and health reporting
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - The `ordersync` binary is a thin shell over this library

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;

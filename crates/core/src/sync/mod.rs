//! Multi-channel order sync

pub mod ports;
pub mod service;

pub use service::OrderSyncService;

//! Database implementations

pub mod credential_repository;
pub mod manager;
pub mod sync_log_repository;

pub use credential_repository::*;
pub use manager::{DbConnection, DbManager};
pub use sync_log_repository::*;

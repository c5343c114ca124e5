//! Application utilities

pub mod health;
pub mod logging;

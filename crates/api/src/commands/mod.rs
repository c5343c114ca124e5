//! Commands - operator surface over the sync services
//!
//! Each command returns `Result<T, String>` so callers get a readable,
//! already-contextualised message.

mod health;
mod sync;

pub use health::*;
pub use sync::*;

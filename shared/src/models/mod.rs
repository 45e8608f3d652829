//! Data models
//!
//! Shared between kitchen-server and frontend (via API).
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod catalog;
pub mod role;

// Re-exports
pub use catalog::*;
pub use role::*;

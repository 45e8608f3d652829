//! Shared types for the kitchen ordering platform
//!
//! Common types used by the server and its clients: the unified error
//! system, catalog read models, order snapshots and events, and small
//! time/id utilities.

pub mod error;
pub mod models;
pub mod order;
pub mod util;

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};

//! Utilities - error re-exports, logging, request validation
//!
//! - [`AppError`] / [`ApiResponse`] - unified error and envelope (from `shared::error`)
//! - [`logger`] - tracing subscriber setup
//! - [`validation`] - validated JSON extractor

pub mod logger;
pub mod validation;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use validation::ValidatedJson;

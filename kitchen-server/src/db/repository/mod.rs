//! Repository Module
//!
//! Free async functions over SQLite. Read functions take
//! `&mut SqliteConnection` so the same code runs on a pooled connection or
//! inside an open transaction (`&mut *tx`).

pub mod catalog;
pub mod order;
pub mod report;

use shared::error::AppError;
use thiserror::Error;

/// SQLite primary result code for `SQLITE_BUSY`
const SQLITE_BUSY: &str = "5";

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database busy: {0}")]
    Busy(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound(err.to_string()),
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    RepoError::Duplicate(db_err.message().to_string())
                } else if db_err.code().as_deref() == Some(SQLITE_BUSY)
                    || db_err.message().contains("database is locked")
                {
                    RepoError::Busy(db_err.message().to_string())
                } else {
                    RepoError::Database(err.to_string())
                }
            }
            sqlx::Error::PoolTimedOut => RepoError::Busy(err.to_string()),
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(err: serde_json::Error) -> Self {
        RepoError::Database(format!("Corrupt JSON column: {err}"))
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Map a repository error onto the API error envelope
pub fn repo_err_to_app(err: RepoError) -> AppError {
    match err {
        RepoError::Validation(msg) => AppError::validation(msg),
        RepoError::Busy(msg) => {
            tracing::warn!(error = %msg, "Database busy");
            AppError::busy()
        }
        RepoError::NotFound(msg) | RepoError::Duplicate(msg) | RepoError::Database(msg) => {
            AppError::database(msg)
        }
    }
}

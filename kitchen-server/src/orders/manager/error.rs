use crate::db::repository::RepoError;
use shared::error::{AppError, ErrorCode};
use shared::order::OrderStatus;
use thiserror::Error;

/// Order engine errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Food not found: {0}")]
    FoodNotFound(i64),

    #[error("Package not found: {0}")]
    PackageNotFound(i64),

    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    #[error("{kind} {id} ({name}) is not available")]
    ItemUnavailable {
        kind: &'static str,
        id: i64,
        name: String,
    },

    #[error("Insufficient stock for {name}: requested {requested}, available {available}")]
    InsufficientStock {
        food_id: i64,
        name: String,
        requested: i64,
        available: i64,
    },

    #[error("Missing required selection for {group_key} on food {food_id}")]
    MissingRequiredSelection {
        food_id: i64,
        group_id: i64,
        group_key: String,
    },

    #[error("Cannot {action} an order in status {from}")]
    InvalidTransition { action: &'static str, from: OrderStatus },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database busy: {0}")]
    Busy(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<RepoError> for OrderError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Validation(msg) => OrderError::Validation(msg),
            RepoError::Busy(msg) => OrderError::Busy(msg),
            RepoError::NotFound(msg) | RepoError::Duplicate(msg) | RepoError::Database(msg) => {
                OrderError::Database(msg)
            }
        }
    }
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::from(err).into()
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        let message = err.to_string();
        match err {
            OrderError::Validation(_) => AppError::validation(message),
            OrderError::FoodNotFound(id) => {
                AppError::with_message(ErrorCode::FoodNotFound, message).with_detail("foodId", id)
            }
            OrderError::PackageNotFound(id) => {
                AppError::with_message(ErrorCode::PackageNotFound, message)
                    .with_detail("packageId", id)
            }
            OrderError::OrderNotFound(id) => {
                AppError::with_message(ErrorCode::OrderNotFound, message)
                    .with_detail("orderId", id)
            }
            OrderError::ItemUnavailable { kind, id, name } => {
                AppError::with_message(ErrorCode::ItemUnavailable, message)
                    .with_detail("kind", kind)
                    .with_detail("id", id)
                    .with_detail("name", name)
            }
            OrderError::InsufficientStock {
                food_id,
                name,
                requested,
                available,
            } => AppError::with_message(ErrorCode::InsufficientStock, message)
                .with_detail("foodId", food_id)
                .with_detail("name", name)
                .with_detail("requested", requested)
                .with_detail("available", available),
            OrderError::MissingRequiredSelection {
                food_id,
                group_id,
                group_key,
            } => AppError::with_message(ErrorCode::MissingRequiredSelection, message)
                .with_detail("foodId", food_id)
                .with_detail("groupId", group_id)
                .with_detail("group", group_key),
            OrderError::InvalidTransition { action, from } => {
                AppError::with_message(ErrorCode::InvalidTransition, message)
                    .with_detail("action", action)
                    .with_detail("from", from.as_str())
            }
            OrderError::Forbidden(msg) => AppError::forbidden(msg),
            OrderError::Busy(msg) => {
                tracing::warn!(error = %msg, "Database busy");
                AppError::busy()
            }
            OrderError::Database(msg) => {
                tracing::error!(error = %msg, "Order database error");
                AppError::database(msg)
            }
        }
    }
}

pub type OrderResult<T> = Result<T, OrderError>;

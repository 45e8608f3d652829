//! Numeric error codes
//!
//! | Range | Domain |
//! |-------|--------|
//! | 0xxx | general |
//! | 1xxx | authentication |
//! | 2xxx | permission |
//! | 4xxx | order lifecycle |
//! | 6xxx | catalog and stock |
//! | 9xxx | system |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code carried in every API error body
///
/// Serialized as a bare number so clients in any language can switch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    Success = 0,
    ValidationFailed = 2,
    NotFound = 3,

    NotAuthenticated = 1001,
    TokenExpired = 1003,
    TokenInvalid = 1004,

    PermissionDenied = 2001,

    OrderNotFound = 4001,
    /// The action is not allowed from the order's current status
    InvalidTransition = 4010,

    FoodNotFound = 6001,
    /// Food or package switched off by an admin or the kitchen
    ItemUnavailable = 6002,
    InsufficientStock = 6003,
    PackageNotFound = 6101,
    /// A required choice group could not be resolved
    MissingRequiredSelection = 6301,

    InternalError = 9001,
    DatabaseError = 9002,
    /// Write lock contention; the request may be retried
    SystemBusy = 9404,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 17] = [
        Self::Success,
        Self::ValidationFailed,
        Self::NotFound,
        Self::NotAuthenticated,
        Self::TokenExpired,
        Self::TokenInvalid,
        Self::PermissionDenied,
        Self::OrderNotFound,
        Self::InvalidTransition,
        Self::FoodNotFound,
        Self::ItemUnavailable,
        Self::InsufficientStock,
        Self::PackageNotFound,
        Self::MissingRequiredSelection,
        Self::InternalError,
        Self::DatabaseError,
        Self::SystemBusy,
    ];

    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Default message when the caller supplies none
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Success => "OK",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::NotAuthenticated => "Authentication required",
            Self::TokenExpired => "Token expired",
            Self::TokenInvalid => "Token invalid",
            Self::PermissionDenied => "Permission denied",
            Self::OrderNotFound => "Order not found",
            Self::InvalidTransition => "Status transition not allowed",
            Self::FoodNotFound => "Food not found",
            Self::ItemUnavailable => "Item not available",
            Self::InsufficientStock => "Insufficient stock",
            Self::PackageNotFound => "Package not found",
            Self::MissingRequiredSelection => "Required selection missing",
            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::SystemBusy => "System busy, retry later",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// A number that names no [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown error code {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|c| c.code() == value)
            .ok_or(InvalidErrorCode(value))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

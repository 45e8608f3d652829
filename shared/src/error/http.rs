//! HTTP status of each error code

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,
            Self::ValidationFailed | Self::MissingRequiredSelection => StatusCode::BAD_REQUEST,
            Self::NotAuthenticated | Self::TokenExpired | Self::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::NotFound | Self::OrderNotFound | Self::FoodNotFound | Self::PackageNotFound => {
                StatusCode::NOT_FOUND
            }
            // The caller's view of status or stock is stale
            Self::InvalidTransition | Self::ItemUnavailable | Self::InsufficientStock => {
                StatusCode::CONFLICT
            }
            Self::SystemBusy => StatusCode::SERVICE_UNAVAILABLE,
            Self::InternalError | Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_failures_map_to_client_statuses() {
        let cases = [
            (ErrorCode::ValidationFailed, 400),
            (ErrorCode::MissingRequiredSelection, 400),
            (ErrorCode::TokenExpired, 401),
            (ErrorCode::PermissionDenied, 403),
            (ErrorCode::FoodNotFound, 404),
            (ErrorCode::OrderNotFound, 404),
            (ErrorCode::InvalidTransition, 409),
            (ErrorCode::InsufficientStock, 409),
            (ErrorCode::ItemUnavailable, 409),
            (ErrorCode::SystemBusy, 503),
            (ErrorCode::DatabaseError, 500),
        ];
        for (code, status) in cases {
            assert_eq!(code.http_status().as_u16(), status, "{code:?}");
        }
    }
}

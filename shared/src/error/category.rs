//! Error domains, derived from the code's thousands digit

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    General,
    Auth,
    Permission,
    Order,
    Catalog,
    /// 9xxx and any range without a domain of its own
    System,
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        match self.code() / 1000 {
            0 => ErrorCategory::General,
            1 => ErrorCategory::Auth,
            2 => ErrorCategory::Permission,
            4 => ErrorCategory::Order,
            6 => ErrorCategory::Catalog,
            _ => ErrorCategory::System,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_digit_selects_domain() {
        assert_eq!(ErrorCode::ValidationFailed.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::TokenInvalid.category(), ErrorCategory::Auth);
        assert_eq!(ErrorCode::PermissionDenied.category(), ErrorCategory::Permission);
        assert_eq!(ErrorCode::InvalidTransition.category(), ErrorCategory::Order);
        assert_eq!(ErrorCode::MissingRequiredSelection.category(), ErrorCategory::Catalog);
        assert_eq!(ErrorCode::SystemBusy.category(), ErrorCategory::System);
    }
}

//! Role Model

use serde::{Deserialize, Serialize};

/// Platform role carried in the access token
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Chef,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Chef => "CHEF",
            Role::Customer => "CUSTOMER",
        }
    }

    /// Admins and chefs operate the kitchen side of an order
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Chef)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

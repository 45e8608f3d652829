//! Order status state machine
//!
//! | action  | from                              | to        |
//! |---------|-----------------------------------|-----------|
//! | accept  | PLACED                            | ACCEPTED  |
//! | start   | PLACED, ACCEPTED                  | COOKING   |
//! | ready   | ACCEPTED, COOKING                 | READY     |
//! | deliver | READY                             | DELIVERED |
//! | cancel  | PLACED, ACCEPTED, COOKING, READY  | CANCELED  |

use super::manager::{OrderError, OrderResult};
use shared::order::OrderStatus;

/// Transition applied to an existing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Accept,
    Start,
    Ready,
    Deliver,
    Cancel,
}

impl Transition {
    pub const ALL: [Transition; 5] = [
        Self::Accept,
        Self::Start,
        Self::Ready,
        Self::Deliver,
        Self::Cancel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Start => "start",
            Self::Ready => "ready",
            Self::Deliver => "deliver",
            Self::Cancel => "cancel",
        }
    }

    /// Statuses this transition may start from
    pub fn allowed_from(&self) -> &'static [OrderStatus] {
        use OrderStatus::*;
        match self {
            Self::Accept => &[Placed],
            Self::Start => &[Placed, Accepted],
            Self::Ready => &[Accepted, Cooking],
            Self::Deliver => &[Ready],
            Self::Cancel => &[Placed, Accepted, Cooking, Ready],
        }
    }

    pub fn target(&self) -> OrderStatus {
        match self {
            Self::Accept => OrderStatus::Accepted,
            Self::Start => OrderStatus::Cooking,
            Self::Ready => OrderStatus::Ready,
            Self::Deliver => OrderStatus::Delivered,
            Self::Cancel => OrderStatus::Canceled,
        }
    }

    /// Lifecycle column stamped when the transition lands
    pub fn timestamp_column(&self) -> &'static str {
        match self {
            Self::Accept => "accepted_at",
            Self::Start => "cooking_at",
            Self::Ready => "ready_at",
            Self::Deliver => "delivered_at",
            Self::Cancel => "canceled_at",
        }
    }

    /// Target status when applied to `from`
    pub fn apply(&self, from: OrderStatus) -> OrderResult<OrderStatus> {
        if self.allowed_from().contains(&from) {
            Ok(self.target())
        } else {
            Err(OrderError::InvalidTransition {
                action: self.as_str(),
                from,
            })
        }
    }
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

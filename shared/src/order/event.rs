//! Order events pushed to connected clients after a committed change

use super::snapshot::Order;
use super::types::OrderStatus;
use serde::{Deserialize, Serialize};

/// Event type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderEventType {
    /// A new order was placed
    Created,
    /// accept / start / ready / deliver / cancel
    StatusChanged,
}

impl OrderEventType {
    /// Socket.IO event name
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Created => "order:new",
            Self::StatusChanged => "order:status",
        }
    }
}

/// Order event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderEvent {
    pub event_type: OrderEventType,
    /// Order state after the change
    pub order: Order,
    /// Status before the change (None for creation)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_status: Option<OrderStatus>,
    /// Principal that caused the change
    pub operator_id: i64,
    /// Server timestamp (Unix milliseconds)
    pub timestamp: i64,
}

impl OrderEvent {
    pub fn created(order: Order, operator_id: i64) -> Self {
        Self {
            event_type: OrderEventType::Created,
            timestamp: order.created_at,
            order,
            previous_status: None,
            operator_id,
        }
    }

    pub fn status_changed(order: Order, previous: OrderStatus, operator_id: i64) -> Self {
        Self {
            event_type: OrderEventType::StatusChanged,
            timestamp: order.updated_at,
            order,
            previous_status: Some(previous),
            operator_id,
        }
    }
}

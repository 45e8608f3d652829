//! Order aggregate as stored and served

use super::types::{OrderLine, OrderStatus, OrderType};
use serde::{Deserialize, Serialize};

/// Order snapshot
///
/// `items` never changes after creation. Only status, lifecycle timestamps
/// and `stock_committed` move, and only until a terminal status is reached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub customer_id: i64,
    /// Correlation key, kept for GROUP orders only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_key: Option<String>,
    #[serde(default)]
    pub notes: String,
    pub items: Vec<OrderLine>,
    /// Stock is decremented for this order and not yet given back
    pub stock_committed: bool,

    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,

    // === Lifecycle (Unix millis, set once each) ===
    pub accepted_at: Option<i64>,
    pub cooking_at: Option<i64>,
    pub ready_at: Option<i64>,
    pub delivered_at: Option<i64>,
    pub canceled_at: Option<i64>,
}

impl Order {
    /// Latest lifecycle timestamp recorded so far
    pub fn last_transition_at(&self) -> i64 {
        [
            self.accepted_at,
            self.cooking_at,
            self.ready_at,
            self.delivered_at,
            self.canceled_at,
        ]
        .into_iter()
        .flatten()
        .fold(self.created_at, i64::max)
    }

    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> Order {
        Order {
            id: 1,
            order_type: OrderType::Group,
            status: OrderStatus::Placed,
            customer_id: 5,
            group_key: Some("team-a".into()),
            notes: String::new(),
            items: vec![OrderLine::Package {
                package_id: 2,
                qty: 1,
                name: "Group".into(),
                image: String::new(),
                items: Vec::new(),
            }],
            stock_committed: true,
            created_by: Some(5),
            updated_by: None,
            created_at: 1_000,
            updated_at: 1_000,
            accepted_at: None,
            cooking_at: None,
            ready_at: None,
            delivered_at: None,
            canceled_at: None,
        }
    }

    #[test]
    fn last_transition_tracks_latest_timestamp() {
        let mut o = order();
        assert_eq!(o.last_transition_at(), 1_000);
        o.accepted_at = Some(2_000);
        o.cooking_at = Some(3_000);
        assert_eq!(o.last_transition_at(), 3_000);
    }

    #[test]
    fn serializes_type_and_camel_case() {
        let v = serde_json::to_value(order()).unwrap();
        assert_eq!(v["type"], "GROUP");
        assert_eq!(v["groupKey"], "team-a");
        assert_eq!(v["stockCommitted"], true);
        assert_eq!(v["customerId"], 5);
    }
}

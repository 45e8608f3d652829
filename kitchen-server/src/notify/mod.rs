//! Order event notification
//!
//! The order manager hands every committed change to an [`OrderNotifier`].
//! Publishing is fire-and-forget: it never blocks the caller and a failed
//! delivery never undoes the change it reports.

pub mod socket;

use shared::order::{Order, OrderEvent};
use std::sync::Mutex;

pub use socket::{SocketContext, SocketNotifier};

pub const ADMIN_ROOM: &str = "room:admin";

pub fn chef_room(kitchen_id: &str) -> String {
    format!("room:chef:{kitchen_id}")
}

pub fn customer_room(customer_id: i64) -> String {
    format!("room:customer:{customer_id}")
}

pub fn order_room(order_id: i64) -> String {
    format!("room:order:{order_id}")
}

/// Every room an event about `order` is delivered to
pub fn rooms_for(order: &Order, kitchen_id: &str) -> Vec<String> {
    vec![
        ADMIN_ROOM.to_string(),
        chef_room(kitchen_id),
        customer_room(order.customer_id),
        order_room(order.id),
    ]
}

/// Sink for committed order changes
pub trait OrderNotifier: Send + Sync {
    fn publish(&self, event: OrderEvent);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl OrderNotifier for NoopNotifier {
    fn publish(&self, _event: OrderEvent) {}
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<OrderEvent>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events published so far, oldest first
    pub fn events(&self) -> Vec<OrderEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl OrderNotifier for RecordingNotifier {
    fn publish(&self, event: OrderEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(_) => tracing::warn!("Recording notifier lock poisoned, event dropped"),
        }
    }
}

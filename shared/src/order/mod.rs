//! Order Module
//!
//! - Types: order type/status, lines and modifiers
//! - Snapshot: the stored order aggregate
//! - Events: pushed to clients after a committed change

pub mod event;
pub mod snapshot;
pub mod types;

// Re-exports
pub use event::{OrderEvent, OrderEventType};
pub use snapshot::Order;
pub use types::*;

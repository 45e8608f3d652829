//! Order engine
//!
//! - **bundle**: package lines -> per-food demand
//! - **modifiers**: free-form selections -> strict modifier snapshot
//! - **catalog**: catalog lookup seam and line resolution
//! - **inventory**: conditional stock reservation and restoration
//! - **state_machine**: allowed status transitions
//! - **manager**: [`OrdersManager`], which ties the pieces into transactions
//!
//! # Data flow
//!
//! ```text
//! CreateOrderRequest -> resolve (expand + normalize) -> reserve -> insert
//!                                                                   |
//!                                                      OrderNotifier::publish
//! ```

pub mod bundle;
pub mod catalog;
pub mod inventory;
pub mod manager;
pub mod modifiers;
pub mod request;
pub mod state_machine;

pub use catalog::CatalogLookup;
pub use manager::{OrderError, OrderResult, OrdersManager};
pub use request::{CreateOrderRequest, LineKind, LineRequest};
pub use state_machine::Transition;

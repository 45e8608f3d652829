//! Order API
//!
//! | Path | Method | Operation |
//! |------|--------|-----------|
//! | /api/orders | GET | list (status, type, groupKey, q, limit, offset) |
//! | /api/orders | POST | place an order (201) |
//! | /api/orders/{id} | GET | one order |
//! | /api/orders/{id}/accept | PATCH | PLACED -> ACCEPTED |
//! | /api/orders/{id}/start | PATCH | ACCEPTED -> COOKING |
//! | /api/orders/{id}/ready | PATCH | COOKING -> READY |
//! | /api/orders/{id}/deliver | PATCH | READY -> DELIVERED |
//! | /api/orders/{id}/cancel | PATCH | any non-terminal -> CANCELED |
//!
//! Every route requires a bearer token; role rules live in the order manager.

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/accept", patch(handler::accept))
        .route("/{id}/start", patch(handler::start))
        .route("/{id}/ready", patch(handler::ready))
        .route("/{id}/deliver", patch(handler::deliver))
        .route("/{id}/cancel", patch(handler::cancel))
}

//! Reports API
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/reports/admin/summary?days=14 | GET | ADMIN |
//!
//! `days` is 1..=180 (default 14) and bounds the daily series and the top
//! item rankings. Distributions and order cards cover all time.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reports", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/admin/summary", get(handler::admin_summary))
}

//! Kitchen Server - order lifecycle and inventory reservation service
//!
//! # Architecture
//!
//! - **Orders** (`orders`): bundle expansion, modifier normalization,
//!   conditional stock reservation and the order state machine
//! - **Database** (`db`): SQLite (WAL) catalog read model and order store
//! - **Auth** (`auth`): JWT principal extraction and role policy
//! - **Notify** (`notify`): Socket.IO room fan-out of order events
//! - **HTTP API** (`api`): REST endpoints
//!
//! # Module layout
//!
//! ```text
//! kitchen-server/src/
//! ├── core/          # config, state, server, errors
//! ├── auth/          # JWT, extractor, policy
//! ├── db/            # connection pool, repositories
//! ├── orders/        # order engine
//! ├── notify/        # event publishing
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod notify;
pub mod orders;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::OrdersManager;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - supports tracing format specifiers
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
  _  ___ _       _
 | |/ (_) |_ ___| |_  ___ _ _
 | ' <| |  _/ _|| ' \/ -_) ' \
 |_|\_\_|\__\__||_||_\___|_||_|
    "#
    );
}

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::notify::OrderNotifier;
use crate::orders::OrdersManager;

/// Server state - shared handles for every request
///
/// Cloning is cheap: the pool and services are reference counted.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | config | Arc<Config> | immutable configuration |
/// | pool | SqlitePool | catalog + order store |
/// | jwt_service | Arc<JwtService> | bearer token validation |
/// | orders | Arc<OrdersManager> | order lifecycle engine |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
    pub orders: Arc<OrdersManager>,
}

impl ServerState {
    /// Wire the services around an open pool and an event sink
    pub fn new(config: Config, pool: SqlitePool, notifier: Arc<dyn OrderNotifier>) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let orders = Arc::new(OrdersManager::new(pool.clone(), notifier));
        Self {
            config: Arc::new(config),
            pool,
            jwt_service,
            orders,
        }
    }
}

//! Server implementation
//!
//! One listener serves the REST API and the Socket.IO endpoint.

use std::net::SocketAddr;
use std::sync::Arc;

use socketioxide::SocketIo;

use crate::core::{Config, Result, ServerError, ServerState};
use crate::db::{DbService, seed};
use crate::notify::{SocketContext, SocketNotifier, socket};

/// HTTP + Socket.IO server
pub struct Server {
    config: Config,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn run(&self) -> Result<()> {
        self.config.validate()?;
        if self.config.jwt_secret_generated {
            tracing::warn!("JWT_SECRET not set, using a random secret; issued tokens die with this process");
        }

        let db = DbService::new(&self.config.database_path).await?;
        if self.config.seed_demo_data {
            seed::seed_demo(&db.pool)
                .await
                .map_err(|e| ServerError::Database(e.to_string()))?;
        }

        let (io_layer, io) = SocketIo::new_layer();
        let notifier = Arc::new(SocketNotifier::new(
            io.clone(),
            self.config.kitchen_id.clone(),
        ));
        let state = ServerState::new(self.config.clone(), db.pool.clone(), notifier);

        socket::register(
            &io,
            SocketContext {
                jwt_service: state.jwt_service.clone(),
                pool: state.pool.clone(),
                kitchen_id: self.config.kitchen_id.clone(),
            },
        );

        let app = crate::api::build_app(state).layer(io_layer);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(%addr, kitchen_id = %self.config.kitchen_id, "Kitchen server listening");

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(ServerError::Io)?;

        db.pool.close().await;
        Ok(())
    }
}

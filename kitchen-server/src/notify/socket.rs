//! Socket.IO fan-out
//!
//! Clients connect with `auth: { token }`. The token decides which rooms
//! the socket joins on connect; a socket may additionally join the room of
//! a single order it is allowed to read (`join-order`).

use super::{ADMIN_ROOM, OrderNotifier, chef_room, customer_room, order_room, rooms_for};
use crate::auth::{CurrentUser, JwtService, policy};
use crate::db::repository::order;
use crate::security_log;
use serde::{Deserialize, Serialize};
use shared::models::Role;
use shared::order::OrderEvent;
use socketioxide::SocketIo;
use socketioxide::extract::{AckSender, Data, SocketRef, TryData};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Publishes order events to Socket.IO rooms
#[derive(Clone)]
pub struct SocketNotifier {
    io: SocketIo,
    kitchen_id: String,
}

impl SocketNotifier {
    pub fn new(io: SocketIo, kitchen_id: impl Into<String>) -> Self {
        Self {
            io,
            kitchen_id: kitchen_id.into(),
        }
    }
}

impl OrderNotifier for SocketNotifier {
    fn publish(&self, event: OrderEvent) {
        let io = self.io.clone();
        let rooms = rooms_for(&event.order, &self.kitchen_id);
        let name = event.event_type.event_name();
        tokio::spawn(async move {
            if let Err(e) = io.to(rooms).emit(name, &event.order).await {
                tracing::warn!(
                    order_id = event.order.id,
                    event = name,
                    error = %e,
                    "Order event broadcast failed"
                );
            }
        });
    }
}

/// Handshake payload
#[derive(Debug, Deserialize)]
pub struct SocketAuth {
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JoinOrder {
    order_id: i64,
}

#[derive(Debug, Serialize)]
struct JoinAck {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// What the connection handlers need
#[derive(Clone)]
pub struct SocketContext {
    pub jwt_service: Arc<JwtService>,
    pub pool: SqlitePool,
    /// Kitchen whose chef room receives every order event
    pub kitchen_id: String,
}

/// Rooms joined on connect
///
/// Orders carry no kitchen, so every chef joins the service kitchen room the
/// notifier targets. A chef token naming another kitchen adds that room too.
pub fn initial_rooms(user: &CurrentUser, service_kitchen: &str) -> Vec<String> {
    match user.role {
        Role::Admin => vec![ADMIN_ROOM.to_string()],
        Role::Chef => {
            let mut rooms = vec![chef_room(service_kitchen)];
            if let Some(kitchen) = user.kitchen_id.as_deref().filter(|k| *k != service_kitchen) {
                rooms.push(chef_room(kitchen));
            }
            rooms
        }
        Role::Customer => vec![customer_room(user.id)],
    }
}

/// Register the default namespace
pub fn register(io: &SocketIo, ctx: SocketContext) {
    io.ns("/", move |socket: SocketRef, TryData(auth): TryData<SocketAuth>| {
        let ctx = ctx.clone();
        async move { on_connect(socket, auth.ok(), ctx).await }
    });
}

async fn on_connect(socket: SocketRef, auth: Option<SocketAuth>, ctx: SocketContext) {
    let user = match auth {
        Some(a) => ctx
            .jwt_service
            .validate_token(&a.token)
            .and_then(CurrentUser::try_from)
            .map_err(|e| e.to_string()),
        None => Err("missing token".to_string()),
    };
    let user = match user {
        Ok(user) => user,
        Err(error) => {
            security_log!(
                "WARN",
                "socket_auth_failed",
                socket_id = socket.id.to_string(),
                error = error
            );
            let _ = socket.disconnect();
            return;
        }
    };

    let rooms = initial_rooms(&user, &ctx.kitchen_id);
    tracing::debug!(socket_id = %socket.id, user_id = user.id, ?rooms, "Socket connected");
    let _ = socket.join(rooms);

    socket.on(
        "join-order",
        move |socket: SocketRef, Data(req): Data<JoinOrder>, ack: AckSender| {
            let ctx = ctx.clone();
            let user = user.clone();
            async move {
                let reply = match can_follow(&ctx, &user, req.order_id).await {
                    Ok(()) => {
                        let _ = socket.join(order_room(req.order_id));
                        JoinAck {
                            ok: true,
                            error: None,
                        }
                    }
                    Err(error) => JoinAck {
                        ok: false,
                        error: Some(error),
                    },
                };
                let _ = ack.send(&reply);
            }
        },
    );
}

async fn can_follow(ctx: &SocketContext, user: &CurrentUser, order_id: i64) -> Result<(), String> {
    let mut conn = ctx.pool.acquire().await.map_err(|e| e.to_string())?;
    let found = order::find_by_id(&mut conn, order_id)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("Order {order_id} not found"))?;
    policy::check_order_access(user, &found).map_err(|e| e.to_string())
}

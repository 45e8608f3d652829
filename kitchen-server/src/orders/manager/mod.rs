//! OrdersManager - order lifecycle engine
//!
//! # Flow
//!
//! ```text
//! create:     policy -> validate -> BEGIN IMMEDIATE -> resolve lines
//!             -> reserve stock -> insert -> COMMIT -> publish order:new
//! transition: policy -> load -> state machine -> conditional UPDATE
//!             (reload and re-check on a lost race) -> publish order:status
//! cancel:     policy -> BEGIN IMMEDIATE -> load -> state machine
//!             -> restore stock -> conditional UPDATE -> COMMIT -> publish
//! ```
//!
//! Writers that touch stock open their transaction with `BEGIN IMMEDIATE`,
//! so they queue on SQLite's write lock (bounded by `busy_timeout`) instead
//! of failing on a read-to-write upgrade. Events are published only after
//! the commit succeeded.

mod error;

pub use error::{OrderError, OrderResult};

use super::bundle;
use super::catalog::resolve_lines;
use super::inventory;
use super::request::CreateOrderRequest;
use super::state_machine::Transition;
use crate::auth::{CurrentUser, policy};
use crate::db::repository::order::{self as order_repo, OrderFilter, StatusUpdate};
use crate::notify::OrderNotifier;
use shared::order::{Order, OrderEvent, OrderStatus, OrderType};
use shared::util::{monotonic_after, now_millis, snowflake_id};
use sqlx::SqlitePool;
use std::sync::Arc;
use validator::Validate;

const BEGIN_IMMEDIATE: &str = "BEGIN IMMEDIATE";

/// Order lifecycle engine
pub struct OrdersManager {
    pool: SqlitePool,
    notifier: Arc<dyn OrderNotifier>,
}

impl std::fmt::Debug for OrdersManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersManager").finish_non_exhaustive()
    }
}

impl OrdersManager {
    pub fn new(pool: SqlitePool, notifier: Arc<dyn OrderNotifier>) -> Self {
        Self { pool, notifier }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Place an order: snapshot the lines and reserve their stock atomically
    pub async fn create(&self, user: &CurrentUser, req: CreateOrderRequest) -> OrderResult<Order> {
        let customer_id = policy::order_owner(user, req.customer_id)?;
        req.validate()
            .map_err(|e| OrderError::Validation(e.to_string()))?;

        let mut tx = self.pool.begin_with(BEGIN_IMMEDIATE).await?;

        let resolved = resolve_lines(&mut *tx, &req.items).await?;
        let reserved = inventory::reserve(&mut *tx, &resolved.demand, &resolved.foods).await?;

        let now = now_millis();
        let group_key = match req.order_type {
            OrderType::Group => req
                .group_key
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            OrderType::Individual | OrderType::Workshop => None,
        };
        let order = Order {
            id: snowflake_id(),
            order_type: req.order_type,
            status: OrderStatus::Placed,
            customer_id,
            group_key,
            notes: req.notes.trim().to_string(),
            items: resolved.lines,
            stock_committed: true,
            created_by: Some(user.id),
            updated_by: Some(user.id),
            created_at: now,
            updated_at: now,
            accepted_at: None,
            cooking_at: None,
            ready_at: None,
            delivered_at: None,
            canceled_at: None,
        };
        order_repo::insert(&mut *tx, &order).await?;
        tx.commit().await?;

        tracing::info!(
            order_id = order.id,
            customer_id,
            order_type = order.order_type.as_str(),
            lines = order.items.len(),
            stock_rows = reserved.len(),
            "Order placed"
        );
        for change in &reserved {
            tracing::debug!(
                order_id = order.id,
                food_id = change.food_id,
                before = change.before,
                after = change.after,
                "Stock reserved"
            );
        }

        self.notifier.publish(OrderEvent::created(order.clone(), user.id));
        Ok(order)
    }

    pub async fn accept(&self, user: &CurrentUser, order_id: i64) -> OrderResult<Order> {
        self.transition(user, order_id, Transition::Accept).await
    }

    pub async fn start(&self, user: &CurrentUser, order_id: i64) -> OrderResult<Order> {
        self.transition(user, order_id, Transition::Start).await
    }

    pub async fn ready(&self, user: &CurrentUser, order_id: i64) -> OrderResult<Order> {
        self.transition(user, order_id, Transition::Ready).await
    }

    pub async fn deliver(&self, user: &CurrentUser, order_id: i64) -> OrderResult<Order> {
        self.transition(user, order_id, Transition::Deliver).await
    }

    pub async fn cancel(&self, user: &CurrentUser, order_id: i64) -> OrderResult<Order> {
        self.transition(user, order_id, Transition::Cancel).await
    }

    /// Apply a status transition
    pub async fn transition(
        &self,
        user: &CurrentUser,
        order_id: i64,
        transition: Transition,
    ) -> OrderResult<Order> {
        policy::check_transition_role(user, transition)?;

        let (previous, order) = match transition {
            Transition::Cancel => self.apply_cancel(user, order_id).await?,
            _ => self.apply_status(user, order_id, transition).await?,
        };

        tracing::info!(
            order_id,
            action = transition.as_str(),
            from = previous.as_str(),
            to = order.status.as_str(),
            operator_id = user.id,
            "Order status changed"
        );
        self.notifier
            .publish(OrderEvent::status_changed(order.clone(), previous, user.id));
        Ok(order)
    }

    /// accept / start / ready / deliver: one conditional row update
    ///
    /// When another operator moves the order between the read and the write,
    /// the transition is re-checked against the status that landed and
    /// retried. Statuses only move forward, so the retries are bounded.
    async fn apply_status(
        &self,
        user: &CurrentUser,
        order_id: i64,
        transition: Transition,
    ) -> OrderResult<(OrderStatus, Order)> {
        let mut conn = self.pool.acquire().await?;

        let mut current = order_repo::find_by_id(&mut conn, order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(order_id))?;
        policy::check_order_access(user, &current)?;

        loop {
            let target = transition.apply(current.status)?;
            let update = StatusUpdate {
                from: current.status,
                to: target,
                timestamp_column: transition.timestamp_column(),
                at: monotonic_after(Some(current.last_transition_at()), now_millis()),
                operator_id: user.id,
                release_stock: false,
            };
            if order_repo::update_status(&mut conn, order_id, update).await? {
                break;
            }

            let latest = order_repo::find_by_id(&mut conn, order_id)
                .await?
                .ok_or(OrderError::OrderNotFound(order_id))?;
            tracing::debug!(
                order_id,
                action = transition.as_str(),
                expected = current.status.as_str(),
                found = latest.status.as_str(),
                "Order moved concurrently, re-checking transition"
            );
            current = latest;
        }

        let order = order_repo::find_by_id(&mut conn, order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(order_id))?;
        Ok((current.status, order))
    }

    /// cancel: restore stock and flip status in one transaction
    async fn apply_cancel(
        &self,
        user: &CurrentUser,
        order_id: i64,
    ) -> OrderResult<(OrderStatus, Order)> {
        let mut tx = self.pool.begin_with(BEGIN_IMMEDIATE).await?;

        let current = order_repo::find_by_id(&mut *tx, order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(order_id))?;
        policy::check_order_access(user, &current)?;
        let target = Transition::Cancel.apply(current.status)?;

        let restored = if current.stock_committed {
            let demand = bundle::expand_snapshot(&current.items)?;
            inventory::restore(&mut *tx, &demand).await?
        } else {
            Vec::new()
        };

        let update = StatusUpdate {
            from: current.status,
            to: target,
            timestamp_column: Transition::Cancel.timestamp_column(),
            at: monotonic_after(Some(current.last_transition_at()), now_millis()),
            operator_id: user.id,
            release_stock: true,
        };
        if !order_repo::update_status(&mut *tx, order_id, update).await? {
            return Err(OrderError::InvalidTransition {
                action: Transition::Cancel.as_str(),
                from: current.status,
            });
        }

        let order = order_repo::find_by_id(&mut *tx, order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(order_id))?;
        tx.commit().await?;

        for change in &restored {
            tracing::debug!(
                order_id,
                food_id = change.food_id,
                before = change.before,
                after = change.after,
                "Stock restored"
            );
        }
        Ok((current.status, order))
    }

    /// Read one order
    pub async fn get(&self, user: &CurrentUser, order_id: i64) -> OrderResult<Order> {
        let mut conn = self.pool.acquire().await?;
        let order = order_repo::find_by_id(&mut conn, order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(order_id))?;
        policy::check_order_access(user, &order)?;
        Ok(order)
    }

    /// List orders; customers only ever see their own
    pub async fn list(&self, user: &CurrentUser, mut filter: OrderFilter) -> OrderResult<Vec<Order>> {
        if let Some(customer_id) = policy::list_scope(user) {
            filter.customer_id = Some(customer_id);
        }
        let mut conn = self.pool.acquire().await?;
        Ok(order_repo::list(&mut conn, &filter).await?)
    }
}

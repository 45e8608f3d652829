//! Order Repository
//!
//! Orders are stored one row each; `items` is the immutable JSON snapshot.
//! Status moves only through [`update_status`], which is conditional on the
//! status the caller last observed.

use super::{RepoError, RepoResult};
use shared::order::{Order, OrderLine, OrderStatus, OrderType};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

pub const DEFAULT_LIST_LIMIT: i64 = 50;
pub const MAX_LIST_LIMIT: i64 = 200;

const ORDER_COLUMNS: &str = "id, order_type, status, customer_id, group_key, notes, items, stock_committed, created_by, updated_by, created_at, updated_at, accepted_at, cooking_at, ready_at, delivered_at, canceled_at";

/// Status criterion of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Exact(OrderStatus),
    /// Anything not DELIVERED / CANCELED
    Active,
}

impl StatusFilter {
    /// `ACTIVE` or one of the order statuses
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("ACTIVE") {
            return Some(Self::Active);
        }
        OrderStatus::parse(&s.to_ascii_uppercase()).map(Self::Exact)
    }
}

/// Listing criteria, all optional and combined with AND
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<StatusFilter>,
    pub order_type: Option<OrderType>,
    pub group_key: Option<String>,
    /// Case-insensitive substring of notes, group key or any line name
    pub q: Option<String>,
    pub customer_id: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    order_type: String,
    status: String,
    customer_id: i64,
    group_key: Option<String>,
    notes: String,
    items: String,
    stock_committed: bool,
    created_by: Option<i64>,
    updated_by: Option<i64>,
    created_at: i64,
    updated_at: i64,
    accepted_at: Option<i64>,
    cooking_at: Option<i64>,
    ready_at: Option<i64>,
    delivered_at: Option<i64>,
    canceled_at: Option<i64>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepoError;

    fn try_from(r: OrderRow) -> Result<Self, Self::Error> {
        let order_type = OrderType::parse(&r.order_type).ok_or_else(|| {
            RepoError::Database(format!("Order {} has unknown type {}", r.id, r.order_type))
        })?;
        let status = OrderStatus::parse(&r.status).ok_or_else(|| {
            RepoError::Database(format!("Order {} has unknown status {}", r.id, r.status))
        })?;
        let items: Vec<OrderLine> = serde_json::from_str(&r.items)?;

        Ok(Order {
            id: r.id,
            order_type,
            status,
            customer_id: r.customer_id,
            group_key: r.group_key,
            notes: r.notes,
            items,
            stock_committed: r.stock_committed,
            created_by: r.created_by,
            updated_by: r.updated_by,
            created_at: r.created_at,
            updated_at: r.updated_at,
            accepted_at: r.accepted_at,
            cooking_at: r.cooking_at,
            ready_at: r.ready_at,
            delivered_at: r.delivered_at,
            canceled_at: r.canceled_at,
        })
    }
}

pub async fn insert(conn: &mut SqliteConnection, order: &Order) -> RepoResult<()> {
    if order.items.is_empty() {
        return Err(RepoError::Validation("Order must contain at least one line".into()));
    }
    let items = serde_json::to_string(&order.items)?;

    sqlx::query(
        "INSERT INTO orders (id, order_type, status, customer_id, group_key, notes, items, stock_committed, created_by, updated_by, created_at, updated_at, accepted_at, cooking_at, ready_at, delivered_at, canceled_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
    )
    .bind(order.id)
    .bind(order.order_type.as_str())
    .bind(order.status.as_str())
    .bind(order.customer_id)
    .bind(&order.group_key)
    .bind(&order.notes)
    .bind(items)
    .bind(order.stock_committed)
    .bind(order.created_by)
    .bind(order.updated_by)
    .bind(order.created_at)
    .bind(order.updated_at)
    .bind(order.accepted_at)
    .bind(order.cooking_at)
    .bind(order.ready_at)
    .bind(order.delivered_at)
    .bind(order.canceled_at)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Order>> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;
    row.map(Order::try_from).transpose()
}

/// Status change applied by [`update_status`]
#[derive(Debug, Clone, Copy)]
pub struct StatusUpdate {
    pub from: OrderStatus,
    pub to: OrderStatus,
    /// Lifecycle column stamped with `at`
    pub timestamp_column: &'static str,
    pub at: i64,
    pub operator_id: i64,
    /// Also clear `stock_committed`
    pub release_stock: bool,
}

/// Move an order from `update.from` to `update.to`.
///
/// Returns `false` when the row is missing or its status is no longer
/// `update.from`; nothing is written in that case.
pub async fn update_status(
    conn: &mut SqliteConnection,
    id: i64,
    update: StatusUpdate,
) -> RepoResult<bool> {
    let release = if update.release_stock {
        ", stock_committed = 0"
    } else {
        ""
    };
    let sql = format!(
        "UPDATE orders SET status = ?1, {col} = ?2, updated_at = ?2, updated_by = ?3{release} WHERE id = ?4 AND status = ?5",
        col = update.timestamp_column,
    );
    let rows = sqlx::query(&sql)
        .bind(update.to.as_str())
        .bind(update.at)
        .bind(update.operator_id)
        .bind(id)
        .bind(update.from.as_str())
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// SQLite's `lower()` folds ASCII only, so the pattern must match that
fn like_pattern(q: &str) -> String {
    let escaped = q
        .to_ascii_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Filtered listing, newest first
pub async fn list(conn: &mut SqliteConnection, filter: &OrderFilter) -> RepoResult<Vec<Order>> {
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {ORDER_COLUMNS} FROM orders WHERE 1 = 1"));

    match filter.status {
        Some(StatusFilter::Exact(status)) => {
            qb.push(" AND status = ").push_bind(status.as_str());
        }
        Some(StatusFilter::Active) => {
            qb.push(" AND status NOT IN ('DELIVERED', 'CANCELED')");
        }
        None => {}
    }
    if let Some(order_type) = filter.order_type {
        qb.push(" AND order_type = ").push_bind(order_type.as_str());
    }
    if let Some(group_key) = filter.group_key.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND group_key = ").push_bind(group_key.to_string());
    }
    if let Some(customer_id) = filter.customer_id {
        qb.push(" AND customer_id = ").push_bind(customer_id);
    }
    if let Some(q) = filter.q.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = like_pattern(q);
        qb.push(" AND (lower(notes) LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR lower(coalesce(group_key, '')) LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR EXISTS (SELECT 1 FROM json_each(orders.items) je WHERE lower(json_extract(je.value, '$.name')) LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\'))");
    }

    let limit = filter
        .limit
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .min(MAX_LIST_LIMIT);
    let offset = filter.offset.unwrap_or(0).max(0);
    qb.push(" ORDER BY created_at DESC, id DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    let rows = qb.build_query_as::<OrderRow>().fetch_all(conn).await?;
    rows.into_iter().map(Order::try_from).collect()
}

//! Report Repository
//!
//! Aggregates over the `orders` table and the catalog. Times are Unix
//! millis; day buckets are UTC calendar days of `created_at`.

use super::RepoResult;
use serde::Serialize;
use sqlx::SqliteConnection;

/// Quantity ordered of one food or package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ItemTotal {
    pub id: i64,
    pub name: String,
    pub qty: i64,
}

/// Catalog size and how much of it can be ordered right now
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuCounts {
    pub foods_total: i64,
    /// Enabled globally and in the kitchen, and not sold out
    pub foods_active: i64,
    pub packages_total: i64,
    pub packages_active: i64,
}

/// Orders per status, optionally only those created in `[from, to)`
pub async fn status_counts(
    conn: &mut SqliteConnection,
    created_in: Option<(i64, i64)>,
) -> RepoResult<Vec<(String, i64)>> {
    let rows = match created_in {
        Some((from, to)) => {
            sqlx::query_as::<_, (String, i64)>(
                "SELECT status, COUNT(*) FROM orders WHERE created_at >= ? AND created_at < ? GROUP BY status ORDER BY status",
            )
            .bind(from)
            .bind(to)
            .fetch_all(conn)
            .await?
        }
        None => {
            sqlx::query_as::<_, (String, i64)>(
                "SELECT status, COUNT(*) FROM orders GROUP BY status ORDER BY status",
            )
            .fetch_all(conn)
            .await?
        }
    };
    Ok(rows)
}

/// Orders per type, all time
pub async fn type_counts(conn: &mut SqliteConnection) -> RepoResult<Vec<(String, i64)>> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT order_type, COUNT(*) FROM orders GROUP BY order_type ORDER BY order_type",
    )
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

/// Orders created per UTC day since `from`, as (`YYYY-MM-DD`, count)
///
/// Days without orders are absent.
pub async fn daily_counts(conn: &mut SqliteConnection, from: i64) -> RepoResult<Vec<(String, i64)>> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT strftime('%Y-%m-%d', created_at / 1000, 'unixepoch') AS day, COUNT(*) FROM orders WHERE created_at >= ? GROUP BY day ORDER BY day",
    )
    .bind(from)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

/// Most ordered foods (FOOD lines only) since `from`
pub async fn top_foods(
    conn: &mut SqliteConnection,
    from: i64,
    limit: i64,
) -> RepoResult<Vec<ItemTotal>> {
    top_lines(conn, "FOOD", "$.foodId", from, limit).await
}

/// Most ordered packages since `from`
pub async fn top_packages(
    conn: &mut SqliteConnection,
    from: i64,
    limit: i64,
) -> RepoResult<Vec<ItemTotal>> {
    top_lines(conn, "PACKAGE", "$.packageId", from, limit).await
}

async fn top_lines(
    conn: &mut SqliteConnection,
    kind: &str,
    id_path: &'static str,
    from: i64,
    limit: i64,
) -> RepoResult<Vec<ItemTotal>> {
    let sql = format!(
        "SELECT CAST(json_extract(je.value, '{id_path}') AS INTEGER) AS id, \
         COALESCE(MIN(json_extract(je.value, '$.name')), '') AS name, \
         CAST(SUM(json_extract(je.value, '$.qty')) AS INTEGER) AS qty \
         FROM orders o, json_each(o.items) je \
         WHERE o.created_at >= ?1 AND json_extract(je.value, '$.kind') = ?2 \
         GROUP BY id ORDER BY qty DESC, id ASC LIMIT ?3"
    );
    let rows = sqlx::query_as::<_, ItemTotal>(&sql)
        .bind(from)
        .bind(kind)
        .bind(limit)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

pub async fn menu_counts(conn: &mut SqliteConnection) -> RepoResult<MenuCounts> {
    let (foods_total, foods_active, packages_total, packages_active) =
        sqlx::query_as::<_, (i64, i64, i64, i64)>(
            "SELECT \
             (SELECT COUNT(*) FROM foods), \
             (SELECT COUNT(*) FROM foods WHERE is_active_global = 1 AND is_active_kitchen = 1 AND (stock_qty IS NULL OR stock_qty > 0)), \
             (SELECT COUNT(*) FROM packages), \
             (SELECT COUNT(*) FROM packages WHERE is_active = 1)",
        )
        .fetch_one(conn)
        .await?;
    Ok(MenuCounts {
        foods_total,
        foods_active,
        packages_total,
        packages_active,
    })
}

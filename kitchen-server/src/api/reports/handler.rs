//! Reports API Handlers

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use shared::order::{Order, OrderStatus, OrderType};
use sqlx::SqliteConnection;
use validator::Validate;

use crate::auth::{CurrentUser, policy};
use crate::core::ServerState;
use crate::db::repository::order::{self as order_repo, OrderFilter};
use crate::db::repository::report::{self, ItemTotal};
use crate::db::repository::{RepoResult, repo_err_to_app};
use crate::utils::validation::validation_error;
use crate::utils::{ApiResponse, AppError, AppResult};

const DEFAULT_DAYS: i64 = 14;
const TOP_ITEMS: i64 = 5;
const RECENT_ORDERS: i64 = 10;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSummary {
    pub meta: SummaryMeta,
    pub cards: SummaryCards,
    pub distributions: Distributions,
    /// One entry per day, oldest first, empty days included
    pub series: Vec<DayCount>,
    pub top_foods: Vec<ItemTotal>,
    pub top_packages: Vec<ItemTotal>,
    pub recent_orders: Vec<Order>,
}

#[derive(Debug, Serialize)]
pub struct SummaryMeta {
    /// Start of the first day in the window (Unix millis)
    pub from: i64,
    pub to: i64,
    pub days: i64,
}

#[derive(Debug, Serialize)]
pub struct SummaryCards {
    pub orders: OrderCards,
    pub today: TodayCards,
    pub menu: MenuCards,
}

#[derive(Debug, Default, Serialize)]
pub struct OrderCards {
    pub total: i64,
    pub active: i64,
    pub delivered: i64,
    pub canceled: i64,
}

#[derive(Debug, Default, Serialize)]
pub struct TodayCards {
    pub total: i64,
    pub delivered: i64,
    pub canceled: i64,
}

#[derive(Debug, Serialize)]
pub struct MenuCards {
    pub foods: Availability,
    pub packages: Availability,
}

#[derive(Debug, Serialize)]
pub struct Availability {
    pub total: i64,
    pub active: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Distributions {
    pub by_status: Vec<StatusCount>,
    pub by_type: Vec<TypeCount>,
}

#[derive(Debug, Serialize)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCount {
    /// `YYYY-MM-DD` (UTC)
    pub date: String,
    pub count: i64,
}

// ============================================================================
// Query Parameters
// ============================================================================

#[derive(Debug, Default, Deserialize, Validate)]
pub struct SummaryQuery {
    #[validate(range(min = 1, max = 180, message = "days must be between 1 and 180"))]
    pub days: Option<i64>,
}

// ============================================================================
// Aggregation
// ============================================================================

fn day_start_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// Status rows with unknown values dropped
fn status_rows(rows: Vec<(String, i64)>) -> Vec<StatusCount> {
    rows.into_iter()
        .filter_map(|(status, count)| {
            OrderStatus::parse(&status).map(|status| StatusCount { status, count })
        })
        .collect()
}

fn order_cards(by_status: &[StatusCount]) -> OrderCards {
    by_status.iter().fold(OrderCards::default(), |mut cards, s| {
        cards.total += s.count;
        match s.status {
            OrderStatus::Delivered => cards.delivered += s.count,
            OrderStatus::Canceled => cards.canceled += s.count,
            _ => cards.active += s.count,
        }
        cards
    })
}

fn today_cards(by_status: &[StatusCount]) -> TodayCards {
    let cards = order_cards(by_status);
    TodayCards {
        total: cards.total,
        delivered: cards.delivered,
        canceled: cards.canceled,
    }
}

/// Dense daily series starting at `first_day`
fn fill_series(first_day: NaiveDate, days: i64, counts: &[(String, i64)]) -> Vec<DayCount> {
    let by_day: HashMap<&str, i64> = counts.iter().map(|(d, c)| (d.as_str(), *c)).collect();
    (0..days)
        .map(|offset| {
            let date = (first_day + Duration::days(offset))
                .format("%Y-%m-%d")
                .to_string();
            let count = by_day.get(date.as_str()).copied().unwrap_or(0);
            DayCount { date, count }
        })
        .collect()
}

async fn build_summary(
    conn: &mut SqliteConnection,
    days: i64,
    now: DateTime<Utc>,
) -> RepoResult<AdminSummary> {
    let today = now.date_naive();
    let first_day = today - Duration::days(days - 1);
    let from = day_start_millis(first_day);
    let today_range = (
        day_start_millis(today),
        day_start_millis(today + Duration::days(1)),
    );

    let by_status = status_rows(report::status_counts(&mut *conn, None).await?);
    let today_by_status = status_rows(report::status_counts(&mut *conn, Some(today_range)).await?);
    let by_type = report::type_counts(&mut *conn)
        .await?
        .into_iter()
        .filter_map(|(t, count)| {
            OrderType::parse(&t).map(|order_type| TypeCount { order_type, count })
        })
        .collect();
    let daily = report::daily_counts(&mut *conn, from).await?;
    let top_foods = report::top_foods(&mut *conn, from, TOP_ITEMS).await?;
    let top_packages = report::top_packages(&mut *conn, from, TOP_ITEMS).await?;
    let menu = report::menu_counts(&mut *conn).await?;
    let recent_orders = order_repo::list(
        &mut *conn,
        &OrderFilter {
            limit: Some(RECENT_ORDERS),
            ..OrderFilter::default()
        },
    )
    .await?;

    Ok(AdminSummary {
        meta: SummaryMeta {
            from,
            to: now.timestamp_millis(),
            days,
        },
        cards: SummaryCards {
            orders: order_cards(&by_status),
            today: today_cards(&today_by_status),
            menu: MenuCards {
                foods: Availability {
                    total: menu.foods_total,
                    active: menu.foods_active,
                },
                packages: Availability {
                    total: menu.packages_total,
                    active: menu.packages_active,
                },
            },
        },
        distributions: Distributions { by_status, by_type },
        series: fill_series(first_day, days, &daily),
        top_foods,
        top_packages,
        recent_orders,
    })
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/reports/admin/summary
pub async fn admin_summary(
    State(state): State<ServerState>,
    user: CurrentUser,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> AppResult<Json<ApiResponse<AdminSummary>>> {
    policy::check_admin(&user)?;
    let Query(query) =
        query.map_err(|e| AppError::validation(format!("Invalid query: {}", e.body_text())))?;
    query.validate().map_err(validation_error)?;
    let days = query.days.unwrap_or(DEFAULT_DAYS);

    let mut conn = state
        .pool
        .acquire()
        .await
        .map_err(|e| repo_err_to_app(e.into()))?;
    let summary = build_summary(&mut conn, days, Utc::now())
        .await
        .map_err(repo_err_to_app)?;
    Ok(Json(ApiResponse::success(summary)))
}

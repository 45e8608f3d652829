//! Order API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::order::{Order, OrderType};

use crate::auth::{CurrentUser, policy};
use crate::core::ServerState;
use crate::db::repository::order::{OrderFilter, StatusFilter};
use crate::orders::{CreateOrderRequest, Transition};
use crate::utils::{ApiResponse, AppError, AppResult, ValidatedJson};

/// Query params for listing orders
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// An order status or `ACTIVE`
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub order_type: Option<String>,
    pub group_key: Option<String>,
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl TryFrom<ListQuery> for OrderFilter {
    type Error = AppError;

    fn try_from(query: ListQuery) -> Result<Self, Self::Error> {
        let status = match non_empty(query.status) {
            Some(s) => Some(
                StatusFilter::parse(&s)
                    .ok_or_else(|| AppError::validation(format!("Unknown status filter: {s}")))?,
            ),
            None => None,
        };
        let order_type = match non_empty(query.order_type) {
            Some(t) => Some(
                OrderType::parse(&t.to_ascii_uppercase())
                    .ok_or_else(|| AppError::validation(format!("Unknown order type: {t}")))?,
            ),
            None => None,
        };
        Ok(OrderFilter {
            status,
            order_type,
            group_key: non_empty(query.group_key),
            q: non_empty(query.q),
            customer_id: None,
            limit: query.limit,
            offset: query.offset,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// GET /api/orders
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let filter = OrderFilter::try_from(query)?;
    let orders = state.orders.list(&user, filter).await?;
    Ok(Json(ApiResponse::success(orders)))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.orders.get(&user, id).await?;
    Ok(Json(ApiResponse::success(order)))
}

/// POST /api/orders
///
/// The role gate runs before the body is inspected, so a chef gets 403
/// whatever they send.
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    body: Result<ValidatedJson<CreateOrderRequest>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<Order>>)> {
    policy::check_can_place(&user)?;
    let ValidatedJson(req) = body?;
    let order = state.orders.create(&user, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(order))))
}

async fn transition(
    state: &ServerState,
    user: &CurrentUser,
    id: i64,
    transition: Transition,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.orders.transition(user, id, transition).await?;
    Ok(Json(ApiResponse::success(order)))
}

/// PATCH /api/orders/{id}/accept
pub async fn accept(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Order>>> {
    transition(&state, &user, id, Transition::Accept).await
}

/// PATCH /api/orders/{id}/start
pub async fn start(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Order>>> {
    transition(&state, &user, id, Transition::Start).await
}

/// PATCH /api/orders/{id}/ready
pub async fn ready(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Order>>> {
    transition(&state, &user, id, Transition::Ready).await
}

/// PATCH /api/orders/{id}/deliver
pub async fn deliver(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Order>>> {
    transition(&state, &user, id, Transition::Deliver).await
}

/// PATCH /api/orders/{id}/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Order>>> {
    transition(&state, &user, id, Transition::Cancel).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::OrderStatus;

    #[test]
    fn list_query_maps_to_filter() {
        let filter = OrderFilter::try_from(ListQuery {
            status: Some("active".into()),
            order_type: Some("group".into()),
            group_key: Some("  table-4 ".into()),
            q: Some("   ".into()),
            limit: Some(10),
            offset: None,
        })
        .unwrap();
        assert_eq!(filter.status, Some(StatusFilter::Active));
        assert_eq!(filter.order_type, Some(OrderType::Group));
        assert_eq!(filter.group_key.as_deref(), Some("table-4"));
        assert!(filter.q.is_none());
        assert_eq!(filter.limit, Some(10));

        let exact = OrderFilter::try_from(ListQuery {
            status: Some("READY".into()),
            ..ListQuery::default()
        })
        .unwrap();
        assert_eq!(exact.status, Some(StatusFilter::Exact(OrderStatus::Ready)));
    }

    #[test]
    fn unknown_filters_rejected() {
        let err = OrderFilter::try_from(ListQuery {
            status: Some("SHIPPED".into()),
            ..ListQuery::default()
        })
        .unwrap_err();
        assert_eq!(err.code, shared::error::ErrorCode::ValidationFailed);

        assert!(
            OrderFilter::try_from(ListQuery {
                order_type: Some("TAKEAWAY".into()),
                ..ListQuery::default()
            })
            .is_err()
        );
    }
}

//! Inventory reservation
//!
//! Stock is only ever changed with a single conditional statement per food,
//! executed inside the caller's transaction. There is no read-then-write:
//! the `stock_qty >= ?` guard in the UPDATE is the one check that counts,
//! so two orders racing for the last unit cannot both win.

use super::bundle::FoodDemand;
use super::manager::{OrderError, OrderResult};
use crate::db::repository::catalog;
use shared::models::Food;
use sqlx::SqliteConnection;
use std::collections::HashMap;

/// One stock row touched by a reservation or restoration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockChange {
    pub food_id: i64,
    pub before: i64,
    pub after: i64,
}

/// Decrement stock for every limited food in `demand`.
///
/// `foods` must hold the catalog rows read in the same transaction. On any
/// error the caller must drop the transaction so earlier decrements roll back.
pub async fn reserve(
    conn: &mut SqliteConnection,
    demand: &FoodDemand,
    foods: &HashMap<i64, Food>,
) -> OrderResult<Vec<StockChange>> {
    let mut changes = Vec::new();

    for (&food_id, &qty) in demand {
        let food = foods.get(&food_id).ok_or(OrderError::FoodNotFound(food_id))?;
        if !food.is_available() {
            return Err(OrderError::ItemUnavailable {
                kind: "Food",
                id: food_id,
                name: food.name.clone(),
            });
        }
        if food.is_unlimited() {
            continue;
        }

        let after = sqlx::query_scalar::<_, i64>(
            "UPDATE foods SET stock_qty = stock_qty - ?1 WHERE id = ?2 AND stock_qty IS NOT NULL AND stock_qty >= ?1 RETURNING stock_qty",
        )
        .bind(qty)
        .bind(food_id)
        .fetch_optional(&mut *conn)
        .await?;

        match after {
            Some(after) => changes.push(StockChange {
                food_id,
                before: after + qty,
                after,
            }),
            None => {
                let available = catalog::find_stock(&mut *conn, food_id)
                    .await?
                    .flatten()
                    .unwrap_or(0);
                tracing::info!(
                    food_id,
                    requested = qty,
                    available,
                    "Stock reservation rejected"
                );
                return Err(OrderError::InsufficientStock {
                    food_id,
                    name: food.name.clone(),
                    requested: qty,
                    available,
                });
            }
        }
    }

    Ok(changes)
}

/// Give back stock for every limited food in `demand`.
///
/// Foods removed from the catalog, or switched to unlimited, since the
/// reservation are skipped.
pub async fn restore(
    conn: &mut SqliteConnection,
    demand: &FoodDemand,
) -> OrderResult<Vec<StockChange>> {
    let mut changes = Vec::new();

    for (&food_id, &qty) in demand {
        let after = sqlx::query_scalar::<_, i64>(
            "UPDATE foods SET stock_qty = stock_qty + ?1 WHERE id = ?2 AND stock_qty IS NOT NULL RETURNING stock_qty",
        )
        .bind(qty)
        .bind(food_id)
        .fetch_optional(&mut *conn)
        .await?;

        match after {
            Some(after) => changes.push(StockChange {
                food_id,
                before: after - qty,
                after,
            }),
            None => {
                tracing::warn!(food_id, qty, "Stock not restored: food missing or unlimited");
            }
        }
    }

    Ok(changes)
}

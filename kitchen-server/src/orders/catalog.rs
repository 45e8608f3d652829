//! Catalog lookup seam and line resolution
//!
//! The order engine reads the catalog only through [`CatalogLookup`]. The
//! SQLite implementation runs on the connection that holds the order's
//! write transaction, so every lookup sees the same state the stock
//! decrement will act on.

use super::bundle::{self, FoodDemand, LineRef};
use super::manager::{OrderError, OrderResult};
use super::modifiers::{self, ModifierDefs};
use super::request::LineRequest;
use crate::db::repository::{RepoResult, catalog};
use async_trait::async_trait;
use shared::models::{ChoiceGroup, Food, Ingredient, Package};
use shared::order::OrderLine;
use sqlx::SqliteConnection;
use std::collections::{BTreeSet, HashMap};

/// By-id catalog reads. Missing ids are simply absent from the result.
#[async_trait]
pub trait CatalogLookup: Send {
    async fn foods(&mut self, ids: &[i64]) -> RepoResult<HashMap<i64, Food>>;
    async fn packages(&mut self, ids: &[i64]) -> RepoResult<HashMap<i64, Package>>;
    async fn ingredients(&mut self, ids: &[i64]) -> RepoResult<HashMap<i64, Ingredient>>;
    async fn choice_groups(&mut self, ids: &[i64]) -> RepoResult<HashMap<i64, ChoiceGroup>>;
}

#[async_trait]
impl CatalogLookup for SqliteConnection {
    async fn foods(&mut self, ids: &[i64]) -> RepoResult<HashMap<i64, Food>> {
        catalog::find_foods(self, ids).await
    }

    async fn packages(&mut self, ids: &[i64]) -> RepoResult<HashMap<i64, Package>> {
        catalog::find_packages(self, ids).await
    }

    async fn ingredients(&mut self, ids: &[i64]) -> RepoResult<HashMap<i64, Ingredient>> {
        catalog::find_ingredients(self, ids).await
    }

    async fn choice_groups(&mut self, ids: &[i64]) -> RepoResult<HashMap<i64, ChoiceGroup>> {
        catalog::find_choice_groups(self, ids).await
    }
}

/// Request lines resolved against the catalog
#[derive(Debug)]
pub struct ResolvedLines {
    /// Snapshot lines, in request order
    pub lines: Vec<OrderLine>,
    /// Units needed per food
    pub demand: FoodDemand,
    /// Every food in `demand`, as read
    pub foods: HashMap<i64, Food>,
}

/// Expand and snapshot request lines. Does not touch stock.
pub async fn resolve_lines<C>(lookup: &mut C, items: &[LineRequest]) -> OrderResult<ResolvedLines>
where
    C: CatalogLookup + ?Sized,
{
    let refs = items
        .iter()
        .map(|line| {
            line.line_ref().ok_or_else(|| {
                OrderError::Validation("Each line needs exactly one food or package".into())
            })
        })
        .collect::<OrderResult<Vec<LineRef>>>()?;

    // Packages
    let package_ids: Vec<i64> = refs
        .iter()
        .filter_map(|r| match r {
            LineRef::Package { package_id, .. } => Some(*package_id),
            LineRef::Food { .. } => None,
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let packages = lookup.packages(&package_ids).await?;
    for id in &package_ids {
        let package = packages.get(id).ok_or(OrderError::PackageNotFound(*id))?;
        if !package.is_active {
            return Err(OrderError::ItemUnavailable {
                kind: "Package",
                id: *id,
                name: package.name.clone(),
            });
        }
    }

    // Demand and foods
    let demand = bundle::expand(&refs, &packages)?;
    let food_ids: Vec<i64> = demand.keys().copied().collect();
    let foods = lookup.foods(&food_ids).await?;
    if let Some(missing) = food_ids.iter().find(|id| !foods.contains_key(id)) {
        return Err(OrderError::FoodNotFound(*missing));
    }

    // Definitions for every attachment of directly ordered foods
    let mut ingredient_ids = BTreeSet::new();
    let mut group_ids = BTreeSet::new();
    let ordered_foods = refs.iter().filter_map(|r| match r {
        LineRef::Food { food_id, .. } => foods.get(food_id),
        LineRef::Package { .. } => None,
    });
    for food in ordered_foods {
        ingredient_ids.extend(food.ingredients.iter().map(|a| a.ingredient_id));
        group_ids.extend(food.choice_groups.iter().map(|a| a.group_id));
    }
    let ingredient_ids: Vec<i64> = ingredient_ids.into_iter().collect();
    let group_ids: Vec<i64> = group_ids.into_iter().collect();
    let defs = ModifierDefs {
        ingredients: lookup.ingredients(&ingredient_ids).await?,
        groups: lookup.choice_groups(&group_ids).await?,
    };

    // Snapshot
    let mut lines = Vec::with_capacity(items.len());
    for (item, r) in items.iter().zip(&refs) {
        let line = match *r {
            LineRef::Food { food_id, qty } => {
                let food = foods.get(&food_id).ok_or(OrderError::FoodNotFound(food_id))?;
                OrderLine::Food {
                    food_id,
                    qty,
                    name: food.name.clone(),
                    image: food.image.clone(),
                    modifiers: modifiers::normalize(
                        food,
                        &item.ingredients,
                        &item.choice_groups,
                        &defs,
                    )?,
                }
            }
            LineRef::Package { package_id, qty } => {
                let package = packages
                    .get(&package_id)
                    .ok_or(OrderError::PackageNotFound(package_id))?;
                OrderLine::Package {
                    package_id,
                    qty,
                    name: package.name.clone(),
                    image: package.image.clone(),
                    items: package.items.clone(),
                }
            }
        };
        lines.push(line);
    }

    Ok(ResolvedLines {
        lines,
        demand,
        foods,
    })
}

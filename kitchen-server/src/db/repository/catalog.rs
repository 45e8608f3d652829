//! Catalog Repository
//!
//! Read side consulted while an order is placed, plus the seed writers used
//! by dev bootstrap and tests. Id sets are passed as a JSON array and
//! expanded with `json_each`, so every lookup is one statement per table.

use super::{RepoError, RepoResult};
use shared::models::{
    ChoiceGroup, ChoiceGroupCreate, ChoiceOption, Food, FoodChoiceGroup, FoodCreate,
    FoodIngredient, Ingredient, IngredientCreate, IngredientType, Package, PackageCreate,
    PackageItem,
};
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashMap;

fn id_array(ids: &[i64]) -> String {
    let joined = ids
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("[{joined}]")
}

// ── Rows ─────────────────────────────────────────────────────

#[derive(sqlx::FromRow)]
struct FoodRow {
    id: i64,
    name: String,
    image: String,
    stock_qty: Option<i64>,
    is_active_global: bool,
    is_active_kitchen: bool,
}

impl From<FoodRow> for Food {
    fn from(r: FoodRow) -> Self {
        Food {
            id: r.id,
            name: r.name,
            image: r.image,
            stock_qty: r.stock_qty,
            is_active_global: r.is_active_global,
            is_active_kitchen: r.is_active_kitchen,
            ingredients: Vec::new(),
            choice_groups: Vec::new(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct FoodIngredientRow {
    food_id: i64,
    ingredient_id: i64,
    default_included: bool,
    removable: bool,
}

#[derive(sqlx::FromRow)]
struct FoodChoiceGroupRow {
    food_id: i64,
    group_id: i64,
    default_choice: Option<String>,
}

#[derive(sqlx::FromRow)]
struct IngredientRow {
    id: i64,
    name: String,
    ingredient_type: String,
    min_value: f64,
    max_value: f64,
    is_active: bool,
}

#[derive(sqlx::FromRow)]
struct ChoiceGroupRow {
    id: i64,
    name: String,
    key: String,
    required: bool,
    is_active: bool,
}

/// Choice of an ingredient or a group, keyed by its owner
#[derive(sqlx::FromRow)]
struct ChoiceRow {
    owner_id: i64,
    value: String,
    label: String,
}

#[derive(sqlx::FromRow)]
struct PackageRow {
    id: i64,
    name: String,
    image: String,
    is_active: bool,
}

#[derive(sqlx::FromRow)]
struct PackageItemRow {
    package_id: i64,
    food_id: i64,
    qty: i64,
}

// ── Lookups ──────────────────────────────────────────────────

/// Foods by id, with their ingredient and choice group attachments
pub async fn find_foods(
    conn: &mut SqliteConnection,
    ids: &[i64],
) -> RepoResult<HashMap<i64, Food>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let ids = id_array(ids);

    let rows = sqlx::query_as::<_, FoodRow>(
        "SELECT id, name, image, stock_qty, is_active_global, is_active_kitchen FROM foods WHERE id IN (SELECT value FROM json_each(?))",
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;
    let mut foods: HashMap<i64, Food> = rows.into_iter().map(|r| (r.id, r.into())).collect();

    let ingredients = sqlx::query_as::<_, FoodIngredientRow>(
        "SELECT food_id, ingredient_id, default_included, removable FROM food_ingredients WHERE food_id IN (SELECT value FROM json_each(?)) ORDER BY food_id, sort_order, ingredient_id",
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;
    for row in ingredients {
        if let Some(food) = foods.get_mut(&row.food_id) {
            food.ingredients.push(FoodIngredient {
                ingredient_id: row.ingredient_id,
                default_included: row.default_included,
                removable: row.removable,
            });
        }
    }

    let groups = sqlx::query_as::<_, FoodChoiceGroupRow>(
        "SELECT food_id, group_id, default_choice FROM food_choice_groups WHERE food_id IN (SELECT value FROM json_each(?)) ORDER BY food_id, sort_order, group_id",
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;
    for row in groups {
        if let Some(food) = foods.get_mut(&row.food_id) {
            food.choice_groups.push(FoodChoiceGroup {
                group_id: row.group_id,
                default_choice: row.default_choice,
            });
        }
    }

    Ok(foods)
}

pub async fn find_food(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Food>> {
    Ok(find_foods(conn, &[id]).await?.remove(&id))
}

/// Current stock of one food: `None` if the food is gone, `Some(None)` if unlimited
pub async fn find_stock(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Option<i64>>> {
    let stock = sqlx::query_scalar::<_, Option<i64>>("SELECT stock_qty FROM foods WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(stock)
}

/// Packages by id, with their constituent foods
pub async fn find_packages(
    conn: &mut SqliteConnection,
    ids: &[i64],
) -> RepoResult<HashMap<i64, Package>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let ids = id_array(ids);

    let rows = sqlx::query_as::<_, PackageRow>(
        "SELECT id, name, image, is_active FROM packages WHERE id IN (SELECT value FROM json_each(?))",
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;
    let mut packages: HashMap<i64, Package> = rows
        .into_iter()
        .map(|r| {
            (
                r.id,
                Package {
                    id: r.id,
                    name: r.name,
                    image: r.image,
                    items: Vec::new(),
                    is_active: r.is_active,
                },
            )
        })
        .collect();

    let items = sqlx::query_as::<_, PackageItemRow>(
        "SELECT package_id, food_id, qty FROM package_items WHERE package_id IN (SELECT value FROM json_each(?)) ORDER BY package_id, sort_order, food_id",
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;
    for row in items {
        if let Some(package) = packages.get_mut(&row.package_id) {
            package.items.push(PackageItem {
                food_id: row.food_id,
                qty: row.qty,
            });
        }
    }

    Ok(packages)
}

pub async fn find_ingredients(
    conn: &mut SqliteConnection,
    ids: &[i64],
) -> RepoResult<HashMap<i64, Ingredient>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let ids = id_array(ids);

    let rows = sqlx::query_as::<_, IngredientRow>(
        "SELECT id, name, ingredient_type, min_value, max_value, is_active FROM ingredients WHERE id IN (SELECT value FROM json_each(?))",
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;
    let mut ingredients = HashMap::with_capacity(rows.len());
    for r in rows {
        let ingredient_type = IngredientType::parse(&r.ingredient_type).ok_or_else(|| {
            RepoError::Database(format!(
                "Ingredient {} has unknown type {}",
                r.id, r.ingredient_type
            ))
        })?;
        ingredients.insert(
            r.id,
            Ingredient {
                id: r.id,
                name: r.name,
                ingredient_type,
                choices: Vec::new(),
                min: r.min_value,
                max: r.max_value,
                is_active: r.is_active,
            },
        );
    }

    let choices = sqlx::query_as::<_, ChoiceRow>(
        "SELECT ingredient_id AS owner_id, value, label FROM ingredient_choices WHERE ingredient_id IN (SELECT value FROM json_each(?)) ORDER BY ingredient_id, sort_order, value",
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;
    for c in choices {
        if let Some(ingredient) = ingredients.get_mut(&c.owner_id) {
            ingredient.choices.push(ChoiceOption {
                value: c.value,
                label: c.label,
            });
        }
    }

    Ok(ingredients)
}

pub async fn find_choice_groups(
    conn: &mut SqliteConnection,
    ids: &[i64],
) -> RepoResult<HashMap<i64, ChoiceGroup>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let ids = id_array(ids);

    let rows = sqlx::query_as::<_, ChoiceGroupRow>(
        "SELECT id, name, key, required, is_active FROM choice_groups WHERE id IN (SELECT value FROM json_each(?))",
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;
    let mut groups: HashMap<i64, ChoiceGroup> = rows
        .into_iter()
        .map(|r| {
            (
                r.id,
                ChoiceGroup {
                    id: r.id,
                    name: r.name,
                    key: r.key,
                    required: r.required,
                    choices: Vec::new(),
                    is_active: r.is_active,
                },
            )
        })
        .collect();

    let choices = sqlx::query_as::<_, ChoiceRow>(
        "SELECT group_id AS owner_id, value, label FROM choice_group_choices WHERE group_id IN (SELECT value FROM json_each(?)) ORDER BY group_id, sort_order, value",
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;
    for c in choices {
        if let Some(group) = groups.get_mut(&c.owner_id) {
            group.choices.push(ChoiceOption {
                value: c.value,
                label: c.label,
            });
        }
    }

    Ok(groups)
}

// ── Seed writers ─────────────────────────────────────────────

pub async fn insert_ingredient(pool: &SqlitePool, data: IngredientCreate) -> RepoResult<Ingredient> {
    if data.ingredient_type == IngredientType::Choice && data.choices.is_empty() {
        return Err(RepoError::Validation(format!(
            "CHOICE ingredient {} needs at least one choice",
            data.name
        )));
    }
    if data.ingredient_type == IngredientType::Percent && data.min > data.max {
        return Err(RepoError::Validation(format!(
            "Ingredient {}: min {} exceeds max {}",
            data.name, data.min, data.max
        )));
    }

    let mut tx = pool.begin().await?;
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO ingredients (name, ingredient_type, min_value, max_value, is_active) VALUES (?1, ?2, ?3, ?4, 1) RETURNING id",
    )
    .bind(&data.name)
    .bind(data.ingredient_type.as_str())
    .bind(data.min)
    .bind(data.max)
    .fetch_one(&mut *tx)
    .await?;

    for (i, choice) in data.choices.iter().enumerate() {
        sqlx::query(
            "INSERT INTO ingredient_choices (ingredient_id, value, label, sort_order) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(id)
        .bind(&choice.value)
        .bind(&choice.label)
        .bind(i as i64)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    let mut conn = pool.acquire().await?;
    find_ingredients(&mut conn, &[id])
        .await?
        .remove(&id)
        .ok_or_else(|| RepoError::Database("Failed to create ingredient".into()))
}

pub async fn insert_choice_group(
    pool: &SqlitePool,
    data: ChoiceGroupCreate,
) -> RepoResult<ChoiceGroup> {
    if data.choices.is_empty() {
        return Err(RepoError::Validation(format!(
            "Choice group {} needs at least one choice",
            data.key
        )));
    }

    let mut tx = pool.begin().await?;
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO choice_groups (name, key, required, is_active) VALUES (?1, ?2, ?3, 1) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.key)
    .bind(data.required)
    .fetch_one(&mut *tx)
    .await?;

    for (i, choice) in data.choices.iter().enumerate() {
        sqlx::query(
            "INSERT INTO choice_group_choices (group_id, value, label, sort_order) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(id)
        .bind(&choice.value)
        .bind(&choice.label)
        .bind(i as i64)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    let mut conn = pool.acquire().await?;
    find_choice_groups(&mut conn, &[id])
        .await?
        .remove(&id)
        .ok_or_else(|| RepoError::Database("Failed to create choice group".into()))
}

pub async fn insert_food(pool: &SqlitePool, data: FoodCreate) -> RepoResult<Food> {
    if let Some(qty) = data.stock_qty.filter(|q| *q < 0) {
        return Err(RepoError::Validation(format!(
            "Stock of {} cannot be negative: {qty}",
            data.name
        )));
    }

    let mut tx = pool.begin().await?;
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO foods (name, image, stock_qty, is_active_global, is_active_kitchen) VALUES (?1, ?2, ?3, 1, 1) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.image)
    .bind(data.stock_qty)
    .fetch_one(&mut *tx)
    .await?;

    for (i, att) in data.ingredients.iter().enumerate() {
        sqlx::query(
            "INSERT INTO food_ingredients (food_id, ingredient_id, default_included, removable, sort_order) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(id)
        .bind(att.ingredient_id)
        .bind(att.default_included)
        .bind(att.removable)
        .bind(i as i64)
        .execute(&mut *tx)
        .await?;
    }
    for (i, att) in data.choice_groups.iter().enumerate() {
        sqlx::query(
            "INSERT INTO food_choice_groups (food_id, group_id, default_choice, sort_order) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(id)
        .bind(att.group_id)
        .bind(&att.default_choice)
        .bind(i as i64)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    let mut conn = pool.acquire().await?;
    find_food(&mut conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create food".into()))
}

pub async fn insert_package(pool: &SqlitePool, data: PackageCreate) -> RepoResult<Package> {
    if data.items.is_empty() {
        return Err(RepoError::Validation(format!(
            "Package {} needs at least one item",
            data.name
        )));
    }

    let mut tx = pool.begin().await?;
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO packages (name, image, is_active) VALUES (?1, ?2, 1) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.image)
    .fetch_one(&mut *tx)
    .await?;

    for (i, item) in data.items.iter().enumerate() {
        sqlx::query(
            "INSERT INTO package_items (package_id, food_id, qty, sort_order) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(id)
        .bind(item.food_id)
        .bind(item.qty)
        .bind(i as i64)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    let mut conn = pool.acquire().await?;
    find_packages(&mut conn, &[id])
        .await?
        .remove(&id)
        .ok_or_else(|| RepoError::Database("Failed to create package".into()))
}

/// Overwrite stock (`None` = unlimited)
pub async fn set_stock(pool: &SqlitePool, food_id: i64, stock_qty: Option<i64>) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE foods SET stock_qty = ?1 WHERE id = ?2")
        .bind(stock_qty)
        .bind(food_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Food {food_id} not found")));
    }
    Ok(())
}

pub async fn set_food_active(
    pool: &SqlitePool,
    food_id: i64,
    global: bool,
    kitchen: bool,
) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE foods SET is_active_global = ?1, is_active_kitchen = ?2 WHERE id = ?3",
    )
    .bind(global)
    .bind(kitchen)
    .bind(food_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Food {food_id} not found")));
    }
    Ok(())
}

pub async fn set_package_active(pool: &SqlitePool, package_id: i64, active: bool) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE packages SET is_active = ?1 WHERE id = ?2")
        .bind(active)
        .bind(package_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Package {package_id} not found")));
    }
    Ok(())
}

/// Hard delete a food, attachments cascade. Used to simulate catalog drift.
pub async fn delete_food(pool: &SqlitePool, food_id: i64) -> RepoResult<bool> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM package_items WHERE food_id = ?")
        .bind(food_id)
        .execute(&mut *tx)
        .await?;
    let rows = sqlx::query("DELETE FROM foods WHERE id = ?")
        .bind(food_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn count_foods(pool: &SqlitePool) -> RepoResult<i64> {
    let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM foods")
        .fetch_one(pool)
        .await?;
    Ok(n)
}

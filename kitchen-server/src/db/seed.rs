//! Demo catalog
//!
//! Inserted on startup when `SEED_DEMO_DATA=true` and the catalog is empty.

use super::repository::{RepoResult, catalog};
use shared::models::{
    ChoiceGroupCreate, ChoiceOption, FoodChoiceGroup, FoodCreate, FoodIngredient,
    IngredientCreate, IngredientType, PackageCreate, PackageItem,
};
use sqlx::SqlitePool;

fn option(value: &str, label: &str) -> ChoiceOption {
    ChoiceOption {
        value: value.into(),
        label: label.into(),
    }
}

/// Seed the demo catalog unless foods already exist. Returns whether it ran.
pub async fn seed_demo(pool: &SqlitePool) -> RepoResult<bool> {
    if catalog::count_foods(pool).await? > 0 {
        tracing::debug!("Catalog not empty, demo seed skipped");
        return Ok(false);
    }

    let sugar = catalog::insert_ingredient(
        pool,
        IngredientCreate {
            name: "Sugar".into(),
            ingredient_type: IngredientType::Percent,
            choices: Vec::new(),
            min: 0.0,
            max: 100.0,
        },
    )
    .await?;
    let onion = catalog::insert_ingredient(
        pool,
        IngredientCreate {
            name: "Onion".into(),
            ingredient_type: IngredientType::Boolean,
            choices: Vec::new(),
            min: 0.0,
            max: 0.0,
        },
    )
    .await?;
    let spice = catalog::insert_ingredient(
        pool,
        IngredientCreate {
            name: "Spice level".into(),
            ingredient_type: IngredientType::Choice,
            choices: vec![
                option("mild", "Mild"),
                option("medium", "Medium"),
                option("hot", "Hot"),
            ],
            min: 0.0,
            max: 0.0,
        },
    )
    .await?;
    let coffee_type = catalog::insert_choice_group(
        pool,
        ChoiceGroupCreate {
            name: "Coffee type".into(),
            key: "coffeeType".into(),
            required: true,
            choices: vec![
                option("espresso", "Espresso"),
                option("americano", "Americano"),
                option("latte", "Latte"),
            ],
        },
    )
    .await?;

    let coffee = catalog::insert_food(
        pool,
        FoodCreate {
            name: "Coffee".into(),
            image: String::new(),
            stock_qty: None,
            ingredients: vec![FoodIngredient {
                ingredient_id: sugar.id,
                default_included: true,
                removable: true,
            }],
            choice_groups: vec![FoodChoiceGroup {
                group_id: coffee_type.id,
                default_choice: Some("espresso".into()),
            }],
        },
    )
    .await?;
    let burger = catalog::insert_food(
        pool,
        FoodCreate {
            name: "Burger".into(),
            image: String::new(),
            stock_qty: Some(20),
            ingredients: vec![
                FoodIngredient {
                    ingredient_id: onion.id,
                    default_included: true,
                    removable: true,
                },
                FoodIngredient {
                    ingredient_id: spice.id,
                    default_included: false,
                    removable: true,
                },
            ],
            choice_groups: Vec::new(),
        },
    )
    .await?;
    let fries = catalog::insert_food(
        pool,
        FoodCreate {
            name: "Fries".into(),
            image: String::new(),
            stock_qty: Some(40),
            ingredients: Vec::new(),
            choice_groups: Vec::new(),
        },
    )
    .await?;

    catalog::insert_package(
        pool,
        PackageCreate {
            name: "Burger menu".into(),
            image: String::new(),
            items: vec![
                PackageItem {
                    food_id: burger.id,
                    qty: 1,
                },
                PackageItem {
                    food_id: fries.id,
                    qty: 1,
                },
                PackageItem {
                    food_id: coffee.id,
                    qty: 1,
                },
            ],
        },
    )
    .await?;

    tracing::info!("Demo catalog seeded");
    Ok(true)
}

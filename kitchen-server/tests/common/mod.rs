//! Shared fixtures: temp-file database, catalog seeding, principals

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use kitchen_server::auth::CurrentUser;
use kitchen_server::db::DbService;
use kitchen_server::db::repository::catalog;
use kitchen_server::notify::RecordingNotifier;
use kitchen_server::{Config, OrdersManager, ServerState};
use shared::models::{
    ChoiceGroup, ChoiceGroupCreate, ChoiceOption, Food, FoodChoiceGroup, FoodCreate,
    FoodIngredient, Ingredient, IngredientCreate, IngredientType, Package, PackageCreate,
    PackageItem, Role,
};
use sqlx::SqlitePool;
use tempfile::TempDir;

pub struct TestEnv {
    // Dropping the directory deletes the database
    _dir: TempDir,
    pub pool: SqlitePool,
    pub notifier: Arc<RecordingNotifier>,
    pub state: ServerState,
}

impl TestEnv {
    pub fn orders(&self) -> &OrdersManager {
        &self.state.orders
    }

    /// Current stock of a food (`None` = unlimited)
    pub async fn stock(&self, food_id: i64) -> Option<i64> {
        let mut conn = self.pool.acquire().await.unwrap();
        catalog::find_stock(&mut conn, food_id)
            .await
            .unwrap()
            .expect("food exists")
    }

    pub async fn food(&self, name: &str, stock_qty: Option<i64>) -> Food {
        catalog::insert_food(
            &self.pool,
            FoodCreate {
                name: name.into(),
                image: format!("/img/{}.png", name.to_lowercase()),
                stock_qty,
                ingredients: Vec::new(),
                choice_groups: Vec::new(),
            },
        )
        .await
        .unwrap()
    }

    pub async fn food_with(
        &self,
        name: &str,
        stock_qty: Option<i64>,
        ingredients: Vec<FoodIngredient>,
        choice_groups: Vec<FoodChoiceGroup>,
    ) -> Food {
        catalog::insert_food(
            &self.pool,
            FoodCreate {
                name: name.into(),
                image: String::new(),
                stock_qty,
                ingredients,
                choice_groups,
            },
        )
        .await
        .unwrap()
    }

    pub async fn package(&self, name: &str, items: &[(i64, i64)]) -> Package {
        catalog::insert_package(
            &self.pool,
            PackageCreate {
                name: name.into(),
                image: String::new(),
                items: items
                    .iter()
                    .map(|&(food_id, qty)| PackageItem { food_id, qty })
                    .collect(),
            },
        )
        .await
        .unwrap()
    }

    pub async fn ingredient(&self, name: &str, ingredient_type: IngredientType) -> Ingredient {
        let choices = match ingredient_type {
            IngredientType::Choice => vec![option("mild"), option("hot")],
            _ => Vec::new(),
        };
        catalog::insert_ingredient(
            &self.pool,
            IngredientCreate {
                name: name.into(),
                ingredient_type,
                choices,
                min: 0.0,
                max: 100.0,
            },
        )
        .await
        .unwrap()
    }

    pub async fn choice_group(&self, key: &str, values: &[&str]) -> ChoiceGroup {
        catalog::insert_choice_group(
            &self.pool,
            ChoiceGroupCreate {
                name: key.into(),
                key: key.into(),
                required: true,
                choices: values.iter().map(|v| option(v)).collect(),
            },
        )
        .await
        .unwrap()
    }

    /// Bearer token for `user`
    pub fn token(&self, user: &CurrentUser) -> String {
        self.state
            .jwt_service
            .generate_token(user.id, user.role, user.kitchen_id.as_deref())
            .unwrap()
    }
}

pub fn option(value: &str) -> ChoiceOption {
    ChoiceOption {
        value: value.into(),
        label: value.to_uppercase(),
    }
}

pub fn attach(ingredient_id: i64, default_included: bool, removable: bool) -> FoodIngredient {
    FoodIngredient {
        ingredient_id,
        default_included,
        removable,
    }
}

pub fn admin() -> CurrentUser {
    CurrentUser::new(1, Role::Admin)
}

pub fn chef() -> CurrentUser {
    CurrentUser::new(2, Role::Chef)
}

pub fn customer(id: i64) -> CurrentUser {
    CurrentUser::new(id, Role::Customer)
}

/// Fresh database in its own temp directory
pub async fn setup() -> TestEnv {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kitchen.db");
    let path = path.to_str().unwrap().to_string();

    let db = DbService::new(&path).await.unwrap();
    let notifier = Arc::new(RecordingNotifier::new());
    let state = ServerState::new(Config::for_tests(path), db.pool.clone(), notifier.clone());

    TestEnv {
        _dir: dir,
        pool: db.pool,
        notifier,
        state,
    }
}

/// One request through `app`; the body is parsed as JSON when present
pub async fn call(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

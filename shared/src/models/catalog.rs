//! Catalog read model
//!
//! Foods, ingredients, choice groups and packages as the order engine sees
//! them. Catalog management lives elsewhere; these types only describe what
//! an order needs to resolve names, stock, availability and allowed
//! customizations at the instant it is placed.

use serde::{Deserialize, Serialize};

/// How an ingredient can be customized on a food
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IngredientType {
    /// Include / exclude
    #[default]
    Boolean,
    /// Numeric amount clamped to `[min, max]`
    Percent,
    /// One value out of a fixed list
    Choice,
}

impl IngredientType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::Percent => "PERCENT",
            Self::Choice => "CHOICE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "BOOLEAN" => Some(Self::Boolean),
            "PERCENT" => Some(Self::Percent),
            "CHOICE" => Some(Self::Choice),
            _ => None,
        }
    }
}

/// Allowed value of a CHOICE ingredient or a choice group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

/// Ingredient definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub ingredient_type: IngredientType,
    /// Allowed values (CHOICE only)
    #[serde(default)]
    pub choices: Vec<ChoiceOption>,
    /// Lower bound (PERCENT only)
    pub min: f64,
    /// Upper bound (PERCENT only)
    pub max: f64,
    pub is_active: bool,
}

impl Ingredient {
    pub fn allows(&self, value: &str) -> bool {
        self.choices.iter().any(|c| c.value == value)
    }
}

/// Choice group definition (e.g. "coffee type", "milk")
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceGroup {
    pub id: i64,
    pub name: String,
    /// Stable machine key, e.g. `coffeeType`
    pub key: String,
    /// A food carrying this group cannot be ordered without a value for it
    pub required: bool,
    pub choices: Vec<ChoiceOption>,
    pub is_active: bool,
}

impl ChoiceGroup {
    pub fn allows(&self, value: &str) -> bool {
        self.choices.iter().any(|c| c.value == value)
    }
}

/// Ingredient attached to a food
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FoodIngredient {
    pub ingredient_id: i64,
    /// Part of the dish unless the customer removes it
    pub default_included: bool,
    /// Whether a default-included ingredient may be removed
    pub removable: bool,
}

/// Choice group attached to a food
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FoodChoiceGroup {
    pub group_id: i64,
    /// Food-specific default, used when a required group is not submitted
    pub default_choice: Option<String>,
}

/// Food entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    pub id: i64,
    pub name: String,
    pub image: String,
    /// Units currently available. `None` means unlimited.
    pub stock_qty: Option<i64>,
    /// Admin switch
    pub is_active_global: bool,
    /// Kitchen switch
    pub is_active_kitchen: bool,

    // -- Relations (populated by application code) --
    #[serde(default)]
    pub ingredients: Vec<FoodIngredient>,
    #[serde(default)]
    pub choice_groups: Vec<FoodChoiceGroup>,
}

impl Food {
    /// Orderable only when both the admin and the kitchen switch are on
    pub fn is_available(&self) -> bool {
        self.is_active_global && self.is_active_kitchen
    }

    pub fn is_unlimited(&self) -> bool {
        self.stock_qty.is_none()
    }

    pub fn ingredient(&self, ingredient_id: i64) -> Option<&FoodIngredient> {
        self.ingredients
            .iter()
            .find(|a| a.ingredient_id == ingredient_id)
    }

    pub fn choice_group(&self, group_id: i64) -> Option<&FoodChoiceGroup> {
        self.choice_groups.iter().find(|a| a.group_id == group_id)
    }
}

/// One constituent of a package
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PackageItem {
    pub food_id: i64,
    pub qty: i64,
}

/// Package (bundle of foods). Carries no stock of its own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub items: Vec<PackageItem>,
    pub is_active: bool,
}

// ============================================================================
// Seed payloads
// ============================================================================

/// Create ingredient payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientCreate {
    pub name: String,
    #[serde(rename = "type", default)]
    pub ingredient_type: IngredientType,
    #[serde(default)]
    pub choices: Vec<ChoiceOption>,
    #[serde(default)]
    pub min: f64,
    #[serde(default = "default_percent_max")]
    pub max: f64,
}

fn default_percent_max() -> f64 {
    100.0
}

/// Create choice group payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceGroupCreate {
    pub name: String,
    pub key: String,
    #[serde(default = "default_true")]
    pub required: bool,
    pub choices: Vec<ChoiceOption>,
}

fn default_true() -> bool {
    true
}

/// Create food payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodCreate {
    pub name: String,
    #[serde(default)]
    pub image: String,
    /// `None` creates an unlimited food
    pub stock_qty: Option<i64>,
    #[serde(default)]
    pub ingredients: Vec<FoodIngredient>,
    #[serde(default)]
    pub choice_groups: Vec<FoodChoiceGroup>,
}

/// Create package payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageCreate {
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub items: Vec<PackageItem>,
}

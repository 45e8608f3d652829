//! Shared types for order snapshots

use crate::models::{IngredientType, PackageItem};
use serde::{Deserialize, Serialize};

// ============================================================================
// Order Type / Status
// ============================================================================

/// Order type, fixed at creation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    #[default]
    Individual,
    Group,
    Workshop,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "INDIVIDUAL",
            Self::Group => "GROUP",
            Self::Workshop => "WORKSHOP",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "INDIVIDUAL" => Some(Self::Individual),
            "GROUP" => Some(Self::Group),
            "WORKSHOP" => Some(Self::Workshop),
            _ => None,
        }
    }
}

/// Order status
///
/// ```text
/// PLACED -> ACCEPTED -> COOKING -> READY -> DELIVERED
///    \________\___________\_________\_____-> CANCELED
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Placed,
    Accepted,
    Cooking,
    Ready,
    Delivered,
    Canceled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        Self::Placed,
        Self::Accepted,
        Self::Cooking,
        Self::Ready,
        Self::Delivered,
        Self::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Placed => "PLACED",
            Self::Accepted => "ACCEPTED",
            Self::Cooking => "COOKING",
            Self::Ready => "READY",
            Self::Delivered => "DELIVERED",
            Self::Canceled => "CANCELED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|st| st.as_str() == s)
    }

    /// DELIVERED and CANCELED orders are history only
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Canceled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Lines & Modifiers
// ============================================================================

/// Value of an ingredient modifier, shaped by the ingredient type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ModifierValue {
    /// BOOLEAN: included (`true`) or removed (`false`)
    Bool(bool),
    /// PERCENT: clamped amount
    Percent(f64),
    /// CHOICE: one of the ingredient's allowed values
    Choice(String),
}

/// One applied customization on a food line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(
    tag = "kind",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Modifier {
    Ingredient {
        ingredient_id: i64,
        ingredient_type: IngredientType,
        value: ModifierValue,
    },
    Group {
        group_id: i64,
        choice: String,
    },
}

/// Immutable snapshot of one requested line
///
/// Name, image and package contents are captured at order time so later
/// menu edits never rewrite past orders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(
    tag = "kind",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum OrderLine {
    Food {
        food_id: i64,
        qty: i64,
        name: String,
        #[serde(default)]
        image: String,
        #[serde(default)]
        modifiers: Vec<Modifier>,
    },
    Package {
        package_id: i64,
        qty: i64,
        name: String,
        #[serde(default)]
        image: String,
        /// Package contents at order time (per single package)
        #[serde(default)]
        items: Vec<PackageItem>,
    },
}

impl OrderLine {
    pub fn qty(&self) -> i64 {
        match self {
            Self::Food { qty, .. } | Self::Package { qty, .. } => *qty,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Food { name, .. } | Self::Package { name, .. } => name,
        }
    }

    pub fn modifiers(&self) -> &[Modifier] {
        match self {
            Self::Food { modifiers, .. } => modifiers,
            Self::Package { .. } => &[],
        }
    }
}

//! Order request payloads

use super::bundle::LineRef;
use super::modifiers::{GroupSelection, IngredientSelection};
use serde::{Deserialize, Serialize};
use shared::order::OrderType;
use validator::{Validate, ValidationError};

/// Upper bound of `notes`, in characters
pub const MAX_NOTE_LEN: usize = 500;

/// Kind of a requested line
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineKind {
    Food,
    Package,
}

/// One requested line
///
/// A FOOD line names a `foodId` and may carry selections; a PACKAGE line
/// names a `packageId` and nothing else.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_line_ref"))]
pub struct LineRequest {
    pub kind: LineKind,
    pub food_id: Option<i64>,
    pub package_id: Option<i64>,
    #[validate(range(min = 1, max = 999))]
    pub qty: i64,
    #[serde(default)]
    pub ingredients: Vec<IngredientSelection>,
    #[serde(default)]
    pub choice_groups: Vec<GroupSelection>,
}

fn validate_line_ref(line: &LineRequest) -> Result<(), ValidationError> {
    let ok = match line.kind {
        LineKind::Food => line.food_id.is_some() && line.package_id.is_none(),
        LineKind::Package => {
            line.package_id.is_some()
                && line.food_id.is_none()
                && line.ingredients.is_empty()
                && line.choice_groups.is_empty()
        }
    };
    if ok {
        Ok(())
    } else {
        let mut err = ValidationError::new("line_reference");
        err.message = Some(
            "FOOD lines need exactly a foodId, PACKAGE lines exactly a packageId and no selections"
                .into(),
        );
        Err(err)
    }
}

impl LineRequest {
    pub fn food(food_id: i64, qty: i64) -> Self {
        Self {
            kind: LineKind::Food,
            food_id: Some(food_id),
            package_id: None,
            qty,
            ingredients: Vec::new(),
            choice_groups: Vec::new(),
        }
    }

    pub fn package(package_id: i64, qty: i64) -> Self {
        Self {
            kind: LineKind::Package,
            food_id: None,
            package_id: Some(package_id),
            qty,
            ingredients: Vec::new(),
            choice_groups: Vec::new(),
        }
    }

    /// Expansion view; `None` when the reference does not match the kind
    pub fn line_ref(&self) -> Option<LineRef> {
        match (self.kind, self.food_id, self.package_id) {
            (LineKind::Food, Some(food_id), None) => Some(LineRef::Food {
                food_id,
                qty: self.qty,
            }),
            (LineKind::Package, None, Some(package_id)) => Some(LineRef::Package {
                package_id,
                qty: self.qty,
            }),
            _ => None,
        }
    }
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(rename = "type", default)]
    pub order_type: OrderType,
    /// Kept only for GROUP orders
    #[validate(length(max = 100))]
    pub group_key: Option<String>,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub notes: String,
    /// Admins may order on behalf of a customer
    pub customer_id: Option<i64>,
    #[validate(length(min = 1, max = 100), nested)]
    pub items: Vec<LineRequest>,
}

impl CreateOrderRequest {
    pub fn new(items: Vec<LineRequest>) -> Self {
        Self {
            order_type: OrderType::default(),
            group_key: None,
            notes: String::new(),
            customer_id: None,
            items,
        }
    }
}

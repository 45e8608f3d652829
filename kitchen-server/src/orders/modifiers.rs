//! Modifier normalization
//!
//! Turns free-form customer selections into the strict modifier snapshot
//! stored on a food line. Selections are checked against what the food
//! declares and what the ingredient / group definitions allow; anything
//! that does not fit is dropped, not rejected. The one hard failure is a
//! required choice group that ends up without any value.

use super::manager::{OrderError, OrderResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::{ChoiceGroup, Food, Ingredient, IngredientType};
use shared::order::{Modifier, ModifierValue};
use std::collections::HashMap;

/// Submitted ingredient selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IngredientSelection {
    pub ingredient_id: i64,
    #[serde(default)]
    pub value: Value,
}

/// Submitted choice group selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupSelection {
    pub group_id: i64,
    #[serde(default)]
    pub choice: Value,
}

/// Definitions referenced by the foods of one order
#[derive(Debug, Default)]
pub struct ModifierDefs {
    pub ingredients: HashMap<i64, Ingredient>,
    pub groups: HashMap<i64, ChoiceGroup>,
}

fn percent_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn clamp(n: f64, a: f64, b: f64) -> f64 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    n.max(lo).min(hi)
}

/// Validate one ingredient selection against its definition and attachment
fn ingredient_value(
    def: &Ingredient,
    default_included: bool,
    removable: bool,
    value: &Value,
) -> Option<ModifierValue> {
    match def.ingredient_type {
        IngredientType::Boolean => {
            let included = value.as_bool()?;
            // Forced include: a default part of the dish that cannot be removed
            if !included && default_included && !removable {
                return None;
            }
            Some(ModifierValue::Bool(included))
        }
        IngredientType::Percent => {
            let n = percent_value(value)?;
            Some(ModifierValue::Percent(clamp(n, def.min, def.max)))
        }
        IngredientType::Choice => {
            let choice = value.as_str()?;
            def.allows(choice)
                .then(|| ModifierValue::Choice(choice.to_string()))
        }
    }
}

/// Build the modifier snapshot of one food line.
///
/// Ingredient modifiers come first, then group modifiers, each in the order
/// the food declares them. For repeated ids the first valid selection wins.
pub fn normalize(
    food: &Food,
    ingredients: &[IngredientSelection],
    groups: &[GroupSelection],
    defs: &ModifierDefs,
) -> OrderResult<Vec<Modifier>> {
    let mut chosen_ingredients: HashMap<i64, ModifierValue> = HashMap::new();
    for sel in ingredients {
        if chosen_ingredients.contains_key(&sel.ingredient_id) {
            continue;
        }
        let Some(att) = food.ingredient(sel.ingredient_id) else {
            continue;
        };
        let Some(def) = defs
            .ingredients
            .get(&sel.ingredient_id)
            .filter(|d| d.is_active)
        else {
            continue;
        };
        if let Some(value) = ingredient_value(def, att.default_included, att.removable, &sel.value)
        {
            chosen_ingredients.insert(sel.ingredient_id, value);
        }
    }

    let mut chosen_groups: HashMap<i64, String> = HashMap::new();
    for sel in groups {
        if chosen_groups.contains_key(&sel.group_id) || food.choice_group(sel.group_id).is_none()
        {
            continue;
        }
        let Some(def) = defs.groups.get(&sel.group_id).filter(|d| d.is_active) else {
            continue;
        };
        if let Some(choice) = sel.choice.as_str().filter(|c| def.allows(c)) {
            chosen_groups.insert(sel.group_id, choice.to_string());
        }
    }

    let mut modifiers = Vec::with_capacity(chosen_ingredients.len() + food.choice_groups.len());

    for att in &food.ingredients {
        let Some(value) = chosen_ingredients.remove(&att.ingredient_id) else {
            continue;
        };
        let Some(def) = defs.ingredients.get(&att.ingredient_id) else {
            continue;
        };
        modifiers.push(Modifier::Ingredient {
            ingredient_id: att.ingredient_id,
            ingredient_type: def.ingredient_type,
            value,
        });
    }

    for att in &food.choice_groups {
        let Some(def) = defs.groups.get(&att.group_id).filter(|d| d.is_active) else {
            continue;
        };
        let choice = match chosen_groups.remove(&att.group_id) {
            Some(choice) => choice,
            None if def.required => {
                let fallback = att
                    .default_choice
                    .as_deref()
                    .filter(|c| def.allows(c))
                    .or_else(|| def.choices.first().map(|c| c.value.as_str()));
                match fallback {
                    Some(choice) => choice.to_string(),
                    None => {
                        return Err(OrderError::MissingRequiredSelection {
                            food_id: food.id,
                            group_id: def.id,
                            group_key: def.key.clone(),
                        });
                    }
                }
            }
            None => continue,
        };
        modifiers.push(Modifier::Group {
            group_id: att.group_id,
            choice,
        });
    }

    Ok(modifiers)
}

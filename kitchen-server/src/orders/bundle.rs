//! Bundle expansion
//!
//! Flattens requested lines into the multiset of foods they consume. A
//! package line contributes `line.qty * item.qty` of each constituent food;
//! a food requested several times (directly or through packages) is summed.
//!
//! The same expansion runs on request lines when stock is reserved and on
//! the stored snapshot when it is given back, so both sides always agree.

use super::manager::{OrderError, OrderResult};
use shared::models::{Package, PackageItem};
use shared::order::OrderLine;
use std::collections::{BTreeMap, HashMap};

/// food id -> total units. Ordered, so stock rows are always touched in
/// ascending id order.
pub type FoodDemand = BTreeMap<i64, i64>;

/// Minimal view of a line needed to expand it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRef {
    Food { food_id: i64, qty: i64 },
    Package { package_id: i64, qty: i64 },
}

impl From<&OrderLine> for LineRef {
    fn from(line: &OrderLine) -> Self {
        match line {
            OrderLine::Food { food_id, qty, .. } => LineRef::Food {
                food_id: *food_id,
                qty: *qty,
            },
            OrderLine::Package {
                package_id, qty, ..
            } => LineRef::Package {
                package_id: *package_id,
                qty: *qty,
            },
        }
    }
}

/// Source of package contents
pub trait PackageContents {
    fn contents(&self, package_id: i64) -> Option<&[PackageItem]>;
}

impl PackageContents for HashMap<i64, Package> {
    fn contents(&self, package_id: i64) -> Option<&[PackageItem]> {
        self.get(&package_id).map(|p| p.items.as_slice())
    }
}

/// Stored snapshot lines carry the contents they were reserved with
impl PackageContents for [OrderLine] {
    fn contents(&self, package_id: i64) -> Option<&[PackageItem]> {
        self.iter().find_map(|line| match line {
            OrderLine::Package {
                package_id: id,
                items,
                ..
            } if *id == package_id => Some(items.as_slice()),
            _ => None,
        })
    }
}

fn add(demand: &mut FoodDemand, food_id: i64, qty: i64) -> OrderResult<()> {
    let slot = demand.entry(food_id).or_insert(0);
    *slot = slot
        .checked_add(qty)
        .ok_or_else(|| OrderError::Validation(format!("Quantity overflow for food {food_id}")))?;
    Ok(())
}

/// Expand lines into total demand per food
pub fn expand<P>(lines: &[LineRef], packages: &P) -> OrderResult<FoodDemand>
where
    P: PackageContents + ?Sized,
{
    let mut demand = FoodDemand::new();
    for line in lines {
        match *line {
            LineRef::Food { food_id, qty } => {
                if qty < 1 {
                    return Err(OrderError::Validation(format!(
                        "Quantity for food {food_id} must be at least 1"
                    )));
                }
                add(&mut demand, food_id, qty)?;
            }
            LineRef::Package { package_id, qty } => {
                if qty < 1 {
                    return Err(OrderError::Validation(format!(
                        "Quantity for package {package_id} must be at least 1"
                    )));
                }
                let items = packages
                    .contents(package_id)
                    .ok_or(OrderError::PackageNotFound(package_id))?;
                for item in items {
                    let units = item.qty.checked_mul(qty).ok_or_else(|| {
                        OrderError::Validation(format!(
                            "Quantity overflow for package {package_id}"
                        ))
                    })?;
                    add(&mut demand, item.food_id, units)?;
                }
            }
        }
    }
    Ok(demand)
}

/// Expand a stored snapshot with the package contents captured in it
pub fn expand_snapshot(lines: &[OrderLine]) -> OrderResult<FoodDemand> {
    let refs: Vec<LineRef> = lines.iter().map(LineRef::from).collect();
    expand(&refs, lines)
}

//! Role policy for order operations
//!
//! | operation                   | ADMIN | CHEF | CUSTOMER        |
//! |-----------------------------|-------|------|-----------------|
//! | create                      | yes   | no   | own orders only |
//! | accept, start, ready, cancel| yes   | yes  | no              |
//! | deliver                     | yes   | yes  | own orders only |
//! | read one, list              | all   | all  | own orders only |
//! | reports                     | yes   | no   | no              |

use super::CurrentUser;
use crate::orders::manager::{OrderError, OrderResult};
use crate::orders::state_machine::Transition;
use shared::models::Role;
use shared::order::Order;

/// Role gate for placing orders, checked before the request body is read
pub fn check_can_place(user: &CurrentUser) -> OrderResult<()> {
    match user.role {
        Role::Admin | Role::Customer => Ok(()),
        Role::Chef => Err(OrderError::Forbidden("Chefs cannot place orders".into())),
    }
}

/// Customer the new order will belong to
pub fn order_owner(user: &CurrentUser, requested_customer: Option<i64>) -> OrderResult<i64> {
    match user.role {
        Role::Customer => match requested_customer {
            Some(id) if id != user.id => Err(OrderError::Forbidden(
                "Customers can only order for themselves".into(),
            )),
            _ => Ok(user.id),
        },
        Role::Admin => Ok(requested_customer.unwrap_or(user.id)),
        Role::Chef => Err(OrderError::Forbidden("Chefs cannot place orders".into())),
    }
}

/// Role gate, checked before the order is loaded
pub fn check_transition_role(user: &CurrentUser, transition: Transition) -> OrderResult<()> {
    if user.is_staff() || transition == Transition::Deliver {
        Ok(())
    } else {
        Err(OrderError::Forbidden(format!(
            "Role {} cannot {} orders",
            user.role, transition
        )))
    }
}

/// Ownership gate: customers only touch their own orders
pub fn check_order_access(user: &CurrentUser, order: &Order) -> OrderResult<()> {
    if user.is_staff() || order.customer_id == user.id {
        Ok(())
    } else {
        Err(OrderError::Forbidden(format!(
            "Order {} belongs to another customer",
            order.id
        )))
    }
}

/// Admin-only surfaces such as reports
pub fn check_admin(user: &CurrentUser) -> OrderResult<()> {
    if user.role == Role::Admin {
        Ok(())
    } else {
        Err(OrderError::Forbidden(format!("Role {} cannot view reports", user.role)))
    }
}

/// Customer filter applied to listings
pub fn list_scope(user: &CurrentUser) -> Option<i64> {
    (!user.is_staff()).then_some(user.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> CurrentUser {
        CurrentUser::new(1, Role::Admin)
    }
    fn chef() -> CurrentUser {
        CurrentUser::new(2, Role::Chef)
    }
    fn customer() -> CurrentUser {
        CurrentUser::new(3, Role::Customer)
    }

    #[test]
    fn create_ownership() {
        assert_eq!(order_owner(&customer(), None).unwrap(), 3);
        assert_eq!(order_owner(&customer(), Some(3)).unwrap(), 3);
        assert!(order_owner(&customer(), Some(9)).is_err());
        assert_eq!(order_owner(&admin(), Some(9)).unwrap(), 9);
        assert_eq!(order_owner(&admin(), None).unwrap(), 1);
        assert!(matches!(
            order_owner(&chef(), None),
            Err(OrderError::Forbidden(_))
        ));
    }

    #[test]
    fn only_admins_and_customers_place_orders() {
        assert!(check_can_place(&admin()).is_ok());
        assert!(check_can_place(&customer()).is_ok());
        assert!(matches!(
            check_can_place(&chef()),
            Err(OrderError::Forbidden(_))
        ));
    }

    #[test]
    fn kitchen_transitions_need_staff() {
        for t in [
            Transition::Accept,
            Transition::Start,
            Transition::Ready,
            Transition::Cancel,
        ] {
            assert!(check_transition_role(&chef(), t).is_ok());
            assert!(check_transition_role(&admin(), t).is_ok());
            assert!(check_transition_role(&customer(), t).is_err());
        }
        assert!(check_transition_role(&customer(), Transition::Deliver).is_ok());
    }

    #[test]
    fn reports_are_admin_only() {
        assert!(check_admin(&admin()).is_ok());
        assert!(check_admin(&chef()).is_err());
        assert!(check_admin(&customer()).is_err());
    }

    #[test]
    fn listing_scope() {
        assert_eq!(list_scope(&admin()), None);
        assert_eq!(list_scope(&chef()), None);
        assert_eq!(list_scope(&customer()), Some(3));
    }
}

//! Order status transition table
//!
//! Every status change goes through [`transition`]. The table below is the
//! only place that knows which edge needs which permission.
//!
//! | from         | to        | permission        |
//! |--------------|-----------|-------------------|
//! | PENDING      | PREPARING | `orders:prepare`  |
//! | PREPARING    | READY     | `orders:ready`    |
//! | READY        | SERVED    | `orders:serve`    |
//! | SERVED       | COMPLETED | `orders:checkout` |
//! | non-terminal | CANCELLED | `orders:cancel`   |

use shared::models::Role;
use shared::order::{OrderSnapshot, OrderStatus};

use super::traits::OrderError;
use crate::auth::permissions::{self, role_has_permission};

/// Permission guarding the edge `from -> to`, or `None` if the edge does not exist
pub fn required_permission(from: OrderStatus, to: OrderStatus) -> Option<&'static str> {
    use OrderStatus::*;
    match (from, to) {
        (Pending, Preparing) => Some(permissions::ORDERS_PREPARE),
        (Preparing, Ready) => Some(permissions::ORDERS_READY),
        (Ready, Served) => Some(permissions::ORDERS_SERVE),
        (Served, Completed) => Some(permissions::ORDERS_CHECKOUT),
        (Pending | Preparing | Ready | Served, Cancelled) => Some(permissions::ORDERS_CANCEL),
        _ => None,
    }
}

/// Validate `current -> target` for an operator of `role`
///
/// The edge is checked before the permission, so an illegal move is reported
/// as such regardless of who asked.
pub fn transition(
    current: OrderStatus,
    target: OrderStatus,
    role: Role,
) -> Result<OrderStatus, OrderError> {
    let permission = required_permission(current, target).ok_or(OrderError::InvalidTransition {
        from: current,
        to: target,
    })?;
    require_permission(role, permission)?;
    Ok(target)
}

/// Reject commands against a closed order
pub fn ensure_active(snapshot: &OrderSnapshot) -> Result<(), OrderError> {
    match snapshot.status {
        OrderStatus::Completed => Err(OrderError::OrderAlreadyCompleted(
            snapshot.order_id.clone(),
        )),
        OrderStatus::Cancelled => Err(OrderError::OrderAlreadyCancelled(
            snapshot.order_id.clone(),
        )),
        _ => Ok(()),
    }
}

pub fn require_permission(role: Role, permission: &str) -> Result<(), OrderError> {
    if role_has_permission(role, permission) {
        Ok(())
    } else {
        Err(OrderError::PermissionDenied(format!(
            "role '{}' lacks '{}'",
            role, permission
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn test_forward_path_is_legal_for_the_right_roles() {
        let cases = [
            (Pending, Preparing, Role::Kitchen),
            (Preparing, Ready, Role::Kitchen),
            (Ready, Served, Role::Waiter),
            (Ready, Served, Role::Delivery),
            (Served, Completed, Role::Cashier),
            (Served, Completed, Role::Delivery),
        ];
        for (from, to, role) in cases {
            assert_eq!(transition(from, to, role), Ok(to), "{from} -> {to} as {role}");
        }
    }

    #[test]
    fn test_cancel_from_every_open_status() {
        for from in [Pending, Preparing, Ready, Served] {
            assert_eq!(transition(from, Cancelled, Role::Cashier), Ok(Cancelled));
        }
    }

    #[test]
    fn test_illegal_edges_are_rejected() {
        let cases = [
            (Pending, Ready),
            (Pending, Served),
            (Preparing, Pending),
            (Served, Ready),
            (Ready, Ready),
            (Completed, Cancelled),
            (Cancelled, Pending),
            (Completed, Pending),
        ];
        for (from, to) in cases {
            assert_eq!(
                transition(from, to, Role::Admin),
                Err(OrderError::InvalidTransition { from, to })
            );
        }
    }

    #[test]
    fn test_table_agrees_with_status_graph() {
        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                assert_eq!(
                    required_permission(from, to).is_some(),
                    from.can_transition_to(to),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_role_gating() {
        assert!(matches!(
            transition(Pending, Preparing, Role::Waiter),
            Err(OrderError::PermissionDenied(_))
        ));
        assert!(matches!(
            transition(Served, Completed, Role::Kitchen),
            Err(OrderError::PermissionDenied(_))
        ));
        assert!(matches!(
            transition(Pending, Cancelled, Role::Kitchen),
            Err(OrderError::PermissionDenied(_))
        ));
    }

    #[test]
    fn test_ensure_active() {
        let mut snapshot = OrderSnapshot::new("order-1".to_string());
        assert!(ensure_active(&snapshot).is_ok());

        snapshot.status = Completed;
        assert_eq!(
            ensure_active(&snapshot),
            Err(OrderError::OrderAlreadyCompleted("order-1".to_string()))
        );

        snapshot.status = Cancelled;
        assert_eq!(
            ensure_active(&snapshot),
            Err(OrderError::OrderAlreadyCancelled("order-1".to_string()))
        );
    }
}

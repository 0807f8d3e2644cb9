//! Permission Definitions
//!
//! Role-based permission table. Operators never carry ad-hoc grants: the role
//! asserted by the identity provider decides everything.
//!
//! ## Conventions
//! - `resource:action` strings, e.g. `orders:checkout`
//! - `all` grants everything (admin only)
//! - `resource:*` grants every action on a resource

use shared::models::Role;

pub const ORDERS_READ: &str = "orders:read";
pub const ORDERS_CREATE: &str = "orders:create";
pub const ORDERS_ADD_ITEMS: &str = "orders:add_items";
pub const ORDERS_PREPARE: &str = "orders:prepare";
pub const ORDERS_READY: &str = "orders:ready";
pub const ORDERS_SERVE: &str = "orders:serve";
pub const ORDERS_CHECKOUT: &str = "orders:checkout";
pub const ORDERS_CANCEL: &str = "orders:cancel";
pub const TABLES_READ: &str = "tables:read";
pub const TABLES_MANAGE: &str = "tables:manage";
pub const BILLS_READ: &str = "bills:read";
pub const BILLS_SETTLE: &str = "bills:settle";
pub const DELIVERIES_ASSIGN: &str = "deliveries:assign";

/// Every grantable permission (excluding `all`)
pub const ALL_PERMISSIONS: &[&str] = &[
    ORDERS_READ,
    ORDERS_CREATE,
    ORDERS_ADD_ITEMS,
    ORDERS_PREPARE,
    ORDERS_READY,
    ORDERS_SERVE,
    ORDERS_CHECKOUT,
    ORDERS_CANCEL,
    TABLES_READ,
    TABLES_MANAGE,
    BILLS_READ,
    BILLS_SETTLE,
    DELIVERIES_ASSIGN,
];

pub const DEFAULT_ADMIN_PERMISSIONS: &[&str] = &["all"];

pub const DEFAULT_CAPTAIN_PERMISSIONS: &[&str] = &[
    ORDERS_READ,
    ORDERS_CREATE,
    ORDERS_ADD_ITEMS,
    ORDERS_SERVE,
    ORDERS_CANCEL,
    TABLES_READ,
];

pub const DEFAULT_WAITER_PERMISSIONS: &[&str] =
    &[ORDERS_READ, ORDERS_ADD_ITEMS, ORDERS_SERVE, TABLES_READ];

pub const DEFAULT_KITCHEN_PERMISSIONS: &[&str] = &[ORDERS_READ, ORDERS_PREPARE, ORDERS_READY];

pub const DEFAULT_CASHIER_PERMISSIONS: &[&str] = &[
    ORDERS_READ,
    ORDERS_CREATE,
    ORDERS_ADD_ITEMS,
    ORDERS_CHECKOUT,
    ORDERS_CANCEL,
    TABLES_READ,
    BILLS_READ,
    DELIVERIES_ASSIGN,
];

pub const DEFAULT_DELIVERY_PERMISSIONS: &[&str] = &[ORDERS_READ, ORDERS_SERVE, ORDERS_CHECKOUT];

/// Permission list for a role
pub fn role_permissions(role: Role) -> &'static [&'static str] {
    match role {
        Role::Admin => DEFAULT_ADMIN_PERMISSIONS,
        Role::Captain => DEFAULT_CAPTAIN_PERMISSIONS,
        Role::Waiter => DEFAULT_WAITER_PERMISSIONS,
        Role::Kitchen => DEFAULT_KITCHEN_PERMISSIONS,
        Role::Cashier => DEFAULT_CASHIER_PERMISSIONS,
        Role::Delivery => DEFAULT_DELIVERY_PERMISSIONS,
    }
}

/// Owned permission list, as carried on `CurrentUser`
pub fn get_default_permissions(role: Role) -> Vec<String> {
    role_permissions(role).iter().map(|s| s.to_string()).collect()
}

/// Whether a granted permission covers the requested one
pub fn grant_covers(granted: &str, permission: &str) -> bool {
    if granted == "all" || granted == permission {
        return true;
    }
    match granted.strip_suffix(":*") {
        Some(prefix) => permission
            .split_once(':')
            .is_some_and(|(resource, _)| resource == prefix),
        None => false,
    }
}

/// Check a role against a permission
pub fn role_has_permission(role: Role, permission: &str) -> bool {
    role_permissions(role)
        .iter()
        .any(|granted| grant_covers(granted, permission))
}

/// Validate if a permission string is valid
#[cfg(test)]
fn is_valid_permission(permission: &str) -> bool {
    permission == "all" || ALL_PERMISSIONS.contains(&permission) || permission.ends_with(":*")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_has_everything() {
        for permission in ALL_PERMISSIONS {
            assert!(role_has_permission(Role::Admin, permission));
        }
    }

    #[test]
    fn test_role_gating() {
        assert!(!role_has_permission(Role::Kitchen, ORDERS_CHECKOUT));
        assert!(!role_has_permission(Role::Waiter, ORDERS_PREPARE));
        assert!(role_has_permission(Role::Waiter, ORDERS_SERVE));
        assert!(role_has_permission(Role::Delivery, ORDERS_CHECKOUT));
        assert!(!role_has_permission(Role::Cashier, BILLS_SETTLE));
    }

    #[test]
    fn test_wildcard_grant() {
        assert!(grant_covers("orders:*", ORDERS_CANCEL));
        assert!(!grant_covers("orders:*", TABLES_READ));
        assert!(!grant_covers("orders:read", ORDERS_CREATE));
    }

    #[test]
    fn test_every_default_permission_is_valid() {
        for role in Role::ALL {
            for permission in role_permissions(role) {
                assert!(is_valid_permission(permission), "{permission}");
            }
        }
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User roles for authorization.
///
/// ## Role Hierarchy
///
/// - `Staff` - Sees every order, changes order status, lists users
/// - `Customer` - Normal user, can only access own orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Shop staff
    Staff,
    /// Ordinary customer (least privilege, the default)
    #[default]
    Customer,
}

impl Role {
    /// Role granted by the persisted `is_staff` flag.
    pub fn from_is_staff(is_staff: bool) -> Role {
        if is_staff {
            Role::Staff
        } else {
            Role::Customer
        }
    }

    /// Check if this role has at least the privileges of the required role.
    pub fn has_privilege(&self, required: Role) -> bool {
        match (self, required) {
            // Staff can do anything a customer can
            (Role::Staff, _) => true,
            (Role::Customer, Role::Customer) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Staff => write!(f, "staff"),
            Role::Customer => write!(f, "customer"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_has_all_privileges() {
        assert!(Role::Staff.has_privilege(Role::Staff));
        assert!(Role::Staff.has_privilege(Role::Customer));
    }

    #[test]
    fn customer_only_has_customer_privilege() {
        assert!(!Role::Customer.has_privilege(Role::Staff));
        assert!(Role::Customer.has_privilege(Role::Customer));
    }

    #[test]
    fn role_follows_is_staff_flag() {
        assert_eq!(Role::from_is_staff(true), Role::Staff);
        assert_eq!(Role::from_is_staff(false), Role::Customer);
    }

    #[test]
    fn default_role_is_customer() {
        assert_eq!(Role::default(), Role::Customer);
    }
}

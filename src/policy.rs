// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization policy for every user-facing operation.
//!
//! Handlers never compare user ids or staff flags themselves; they ask
//! [`can_access`] (single order) or [`require_staff`] (whole collections and
//! status changes decided before any lookup).
//!
//! | Action | Allowed | Otherwise |
//! |---|---|---|
//! | `View` | owner or staff | `Forbidden` |
//! | `ViewOwn` | owner | `Concealed` (reported as not found) |
//! | `EditContent` | owner, order pending | `Forbidden` / `NotPending` |
//! | `ChangeStatus` | staff | `Forbidden` |
//! | `Delete` | owner, order pending | `Forbidden` / `NotPending` |

use crate::auth::AuthenticatedUser;
use crate::orders::OrderStatus;
use crate::storage::StoredOrder;

/// Trait for resources that have an owner.
pub trait OwnedResource {
    /// Get the owner's user id.
    fn owner_id(&self) -> u64;

    fn is_owned_by(&self, user: &AuthenticatedUser) -> bool {
        self.owner_id() == user.user_id
    }
}

/// Operation on a single order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    /// Read through the general order endpoint
    View,
    /// Read through the caller's own-orders endpoint
    ViewOwn,
    /// Change quantity or size
    EditContent,
    /// Change order status
    ChangeStatus,
    /// Remove the order
    Delete,
}

/// Why an action was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// Authenticated but lacking role or ownership
    Forbidden,
    /// Not the caller's; must look exactly like a missing order
    Concealed,
    /// Order is no longer pending
    NotPending(OrderStatus),
}

/// Decide whether `actor` may perform `action` on `order`.
///
/// Ownership is evaluated before order state, so a non-owner is told
/// `Forbidden` whatever the status.
pub fn can_access(
    actor: &AuthenticatedUser,
    order: &StoredOrder,
    action: OrderAction,
) -> Result<(), Denial> {
    let owner = order.is_owned_by(actor);

    match action {
        OrderAction::View if owner || actor.is_staff() => Ok(()),
        OrderAction::View => Err(Denial::Forbidden),

        OrderAction::ViewOwn if owner => Ok(()),
        OrderAction::ViewOwn => Err(Denial::Concealed),

        OrderAction::ChangeStatus if actor.is_staff() => Ok(()),
        OrderAction::ChangeStatus => Err(Denial::Forbidden),

        OrderAction::EditContent | OrderAction::Delete => {
            if !owner {
                Err(Denial::Forbidden)
            } else if !order.order_status.is_pending() {
                Err(Denial::NotPending(order.order_status))
            } else {
                Ok(())
            }
        }
    }
}

/// Gate for staff-only actions that need no order lookup to decide: the
/// user directory, the all-orders listing and status changes.
pub fn require_staff(actor: &AuthenticatedUser) -> Result<(), Denial> {
    if actor.is_staff() {
        Ok(())
    } else {
        Err(Denial::Forbidden)
    }
}

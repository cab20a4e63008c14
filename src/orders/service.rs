// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Order lifecycle operations.
//!
//! Every operation takes the authenticated caller and consults
//! [`crate::policy`] before returning or changing anything. Mutations of an
//! existing order run their checks inside the repository's write
//! transaction, so the decision and the write see the same record.

use crate::{
    auth::AuthenticatedUser,
    models::{CreateOrderRequest, UpdateOrderRequest},
    policy::{self, Denial, OrderAction},
    storage::{NewOrder, OrderRepository, PizzaDatabase, StoredOrder},
};

use super::{OrderError, OrderStatus, TransitionPolicy};

const NOT_YOUR_ORDER: &str = "You don't have permission to access this order";
const NOT_YOUR_ORDER_TO_EDIT: &str = "You don't have permission to modify this order";
const NOT_YOUR_ORDER_TO_DELETE: &str = "You don't have permission to delete this order";
const STAFF_ONLY: &str = "Only staff can perform this operation";

/// Order operations on behalf of an authenticated caller.
pub struct OrderService<'a> {
    repo: OrderRepository<'a>,
    transitions: TransitionPolicy,
}

impl<'a> OrderService<'a> {
    pub fn new(db: &'a PizzaDatabase, transitions: TransitionPolicy) -> Self {
        Self {
            repo: OrderRepository::new(db),
            transitions,
        }
    }

    /// Place an order owned by the caller. The initial status is always
    /// `PENDING`.
    pub fn create(
        &self,
        actor: &AuthenticatedUser,
        request: CreateOrderRequest,
    ) -> Result<StoredOrder, OrderError> {
        validate_quantity(request.quantity)?;

        let order = self.repo.create(NewOrder {
            quantity: request.quantity,
            pizza_size: request.pizza_size.unwrap_or_default(),
            order_status: OrderStatus::Pending,
            user_id: actor.user_id,
        })?;

        tracing::info!(
            order_id = order.id,
            user_id = actor.user_id,
            quantity = order.quantity,
            pizza_size = %order.pizza_size,
            "Order created"
        );
        Ok(order)
    }

    /// Fetch an order visible to its owner or to staff.
    pub fn get(&self, actor: &AuthenticatedUser, order_id: u64) -> Result<StoredOrder, OrderError> {
        let order = self.load(order_id)?;
        authorize(actor, &order, OrderAction::View, NOT_YOUR_ORDER)?;
        Ok(order)
    }

    /// The caller's own orders.
    pub fn list_mine(&self, actor: &AuthenticatedUser) -> Result<Vec<StoredOrder>, OrderError> {
        Ok(self.repo.list_by_user(actor.user_id)?)
    }

    /// Fetch one of the caller's own orders. Someone else's order is
    /// reported as not found.
    pub fn get_mine(
        &self,
        actor: &AuthenticatedUser,
        order_id: u64,
    ) -> Result<StoredOrder, OrderError> {
        let order = self.load(order_id)?;
        authorize(actor, &order, OrderAction::ViewOwn, NOT_YOUR_ORDER)?;
        Ok(order)
    }

    /// Every order in the system. Staff only.
    pub fn list_all(&self, actor: &AuthenticatedUser) -> Result<Vec<StoredOrder>, OrderError> {
        policy::require_staff(actor).map_err(|denial| {
            tracing::warn!(user_id = actor.user_id, "Non-staff user attempted to list all orders");
            OrderError::from_denial(denial, 0, STAFF_ONLY)
        })?;
        Ok(self.repo.list_all()?)
    }

    /// Apply a partial content update. Owner only, while pending.
    pub fn update_content(
        &self,
        actor: &AuthenticatedUser,
        order_id: u64,
        request: UpdateOrderRequest,
    ) -> Result<StoredOrder, OrderError> {
        if let Some(quantity) = request.quantity {
            validate_quantity(quantity)?;
        }

        let updated = self
            .repo
            .update_with::<OrderError, _>(order_id, |order| {
                authorize(actor, order, OrderAction::EditContent, NOT_YOUR_ORDER_TO_EDIT)?;
                if let Some(quantity) = request.quantity {
                    order.quantity = quantity;
                }
                if let Some(size) = request.pizza_size {
                    order.pizza_size = size;
                }
                Ok(())
            })?
            .ok_or(OrderError::NotFound(order_id))?;

        tracing::info!(order_id, user_id = actor.user_id, "Order content updated");
        Ok(updated)
    }

    /// Move an order to a new status. Staff only; ownership is irrelevant.
    pub fn update_status(
        &self,
        actor: &AuthenticatedUser,
        order_id: u64,
        new_status: OrderStatus,
    ) -> Result<StoredOrder, OrderError> {
        // Decided before the lookup so non-staff learn nothing about the id
        policy::require_staff(actor).map_err(|denial| {
            tracing::warn!(user_id = actor.user_id, order_id, "Non-staff user attempted a status change");
            OrderError::from_denial(denial, order_id, STAFF_ONLY)
        })?;

        let transitions = self.transitions;
        let mut previous = new_status;
        let updated = self
            .repo
            .update_with::<OrderError, _>(order_id, |order| {
                authorize(actor, order, OrderAction::ChangeStatus, STAFF_ONLY)?;
                if !transitions.allows(order.order_status, new_status) {
                    return Err(OrderError::InvalidTransition {
                        order_id,
                        from: order.order_status,
                        to: new_status,
                    });
                }
                previous = order.order_status;
                order.order_status = new_status;
                Ok(())
            })?
            .ok_or(OrderError::NotFound(order_id))?;

        if previous == new_status {
            tracing::debug!(order_id, status = %new_status, "Order already has requested status");
        } else {
            tracing::info!(
                order_id,
                user_id = actor.user_id,
                from = %previous,
                to = %new_status,
                "Order status changed"
            );
        }
        Ok(updated)
    }

    /// Delete an order. Owner only, while pending; staff have no override.
    pub fn delete(&self, actor: &AuthenticatedUser, order_id: u64) -> Result<(), OrderError> {
        self.repo
            .delete_with::<OrderError, _>(order_id, |order| {
                authorize(actor, order, OrderAction::Delete, NOT_YOUR_ORDER_TO_DELETE)
            })?
            .ok_or(OrderError::NotFound(order_id))?;

        tracing::info!(order_id, user_id = actor.user_id, "Order deleted");
        Ok(())
    }

    fn load(&self, order_id: u64) -> Result<StoredOrder, OrderError> {
        self.repo.get(order_id)?.ok_or(OrderError::NotFound(order_id))
    }
}

fn authorize(
    actor: &AuthenticatedUser,
    order: &StoredOrder,
    action: OrderAction,
    forbidden: &'static str,
) -> Result<(), OrderError> {
    policy::can_access(actor, order, action).map_err(|denial| {
        if denial != Denial::Concealed {
            tracing::warn!(
                user_id = actor.user_id,
                order_id = order.id,
                action = ?action,
                denial = ?denial,
                "Order access denied"
            );
        }
        OrderError::from_denial(denial, order.id, forbidden)
    })
}

fn validate_quantity(quantity: u32) -> Result<(), OrderError> {
    if quantity == 0 {
        return Err(OrderError::InvalidQuantity);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::orders::PizzaSize;
    use std::sync::{Arc, Barrier};
    use std::time::Duration;

    fn make_user(user_id: u64, role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id,
            username: format!("user{user_id}"),
            role,
        }
    }

    fn alice() -> AuthenticatedUser {
        make_user(1, Role::Customer)
    }

    fn bob() -> AuthenticatedUser {
        make_user(2, Role::Customer)
    }

    fn staff() -> AuthenticatedUser {
        make_user(3, Role::Staff)
    }

    fn large(quantity: u32) -> CreateOrderRequest {
        CreateOrderRequest {
            quantity,
            pizza_size: Some(PizzaSize::Large),
        }
    }

    #[test]
    fn create_forces_owner_and_pending() {
        let db = PizzaDatabase::in_memory().unwrap();
        let service = OrderService::new(&db, TransitionPolicy::Strict);

        let order = service.create(&alice(), large(2)).unwrap();
        assert_eq!(order.user_id, 1);
        assert_eq!(order.order_status, OrderStatus::Pending);
        assert_eq!(order.pizza_size, PizzaSize::Large);
    }

    #[test]
    fn create_defaults_size_and_rejects_zero_quantity() {
        let db = PizzaDatabase::in_memory().unwrap();
        let service = OrderService::new(&db, TransitionPolicy::Strict);

        let order = service
            .create(
                &alice(),
                CreateOrderRequest {
                    quantity: 1,
                    pizza_size: None,
                },
            )
            .unwrap();
        assert_eq!(order.pizza_size, PizzaSize::Small);

        let err = service.create(&alice(), large(0)).unwrap_err();
        assert!(matches!(err, OrderError::InvalidQuantity));
    }

    #[test]
    fn create_then_get_mine_round_trips() {
        let db = PizzaDatabase::in_memory().unwrap();
        let service = OrderService::new(&db, TransitionPolicy::Strict);

        let created = service.create(&alice(), large(2)).unwrap();
        let fetched = service.get_mine(&alice(), created.id).unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.quantity, 2);
        assert_eq!(fetched.pizza_size, PizzaSize::Large);
        assert_eq!(fetched.order_status, OrderStatus::Pending);
    }

    #[test]
    fn get_is_forbidden_for_strangers_but_open_to_staff() {
        let db = PizzaDatabase::in_memory().unwrap();
        let service = OrderService::new(&db, TransitionPolicy::Strict);
        let order = service.create(&alice(), large(2)).unwrap();

        assert!(matches!(
            service.get(&bob(), order.id),
            Err(OrderError::Forbidden(_))
        ));
        assert_eq!(service.get(&staff(), order.id).unwrap(), order);
        assert!(matches!(service.get(&alice(), 999), Err(OrderError::NotFound(999))));
    }

    #[test]
    fn get_mine_hides_foreign_orders_as_not_found() {
        let db = PizzaDatabase::in_memory().unwrap();
        let service = OrderService::new(&db, TransitionPolicy::Strict);
        let order = service.create(&alice(), large(2)).unwrap();

        let err = service.get_mine(&bob(), order.id).unwrap_err();
        assert!(matches!(err, OrderError::NotFound(id) if id == order.id));
    }

    #[test]
    fn list_mine_returns_only_callers_orders() {
        let db = PizzaDatabase::in_memory().unwrap();
        let service = OrderService::new(&db, TransitionPolicy::Strict);
        service.create(&alice(), large(1)).unwrap();
        service.create(&bob(), large(2)).unwrap();
        service.create(&alice(), large(3)).unwrap();

        let mine = service.list_mine(&alice()).unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|o| o.user_id == 1));
    }

    #[test]
    fn list_all_is_staff_only() {
        let db = PizzaDatabase::in_memory().unwrap();
        let service = OrderService::new(&db, TransitionPolicy::Strict);
        service.create(&alice(), large(1)).unwrap();
        service.create(&bob(), large(2)).unwrap();

        assert!(matches!(service.list_all(&alice()), Err(OrderError::Forbidden(_))));
        assert_eq!(service.list_all(&staff()).unwrap().len(), 2);
    }

    #[test]
    fn update_content_applies_partial_fields() {
        let db = PizzaDatabase::in_memory().unwrap();
        let service = OrderService::new(&db, TransitionPolicy::Strict);
        let order = service.create(&alice(), large(2)).unwrap();

        let updated = service
            .update_content(
                &alice(),
                order.id,
                UpdateOrderRequest {
                    quantity: Some(5),
                    pizza_size: None,
                },
            )
            .unwrap();
        assert_eq!(updated.quantity, 5);
        assert_eq!(updated.pizza_size, PizzaSize::Large);

        let updated = service
            .update_content(
                &alice(),
                order.id,
                UpdateOrderRequest {
                    quantity: None,
                    pizza_size: Some(PizzaSize::Medium),
                },
            )
            .unwrap();
        assert_eq!(updated.quantity, 5);
        assert_eq!(updated.pizza_size, PizzaSize::Medium);
    }

    #[test]
    fn update_content_checks_existence_then_owner_then_status() {
        let db = PizzaDatabase::in_memory().unwrap();
        let service = OrderService::new(&db, TransitionPolicy::Strict);
        let order = service.create(&alice(), large(2)).unwrap();
        let five = || UpdateOrderRequest {
            quantity: Some(5),
            pizza_size: None,
        };

        assert!(matches!(
            service.update_content(&alice(), 404, five()),
            Err(OrderError::NotFound(404))
        ));

        service
            .update_status(&staff(), order.id, OrderStatus::Delivered)
            .unwrap();

        // Non-owner hears Forbidden even though the order is not pending
        assert!(matches!(
            service.update_content(&bob(), order.id, five()),
            Err(OrderError::Forbidden(_))
        ));
        let err = service.update_content(&alice(), order.id, five()).unwrap_err();
        assert!(matches!(
            err,
            OrderError::NotPending {
                status: OrderStatus::Delivered,
                ..
            }
        ));
        assert!(err.to_string().contains("DELIVERED"));

        // Rejected update did not touch the record
        assert_eq!(service.get(&alice(), order.id).unwrap().quantity, 2);
    }

    #[test]
    fn update_content_rejects_zero_quantity() {
        let db = PizzaDatabase::in_memory().unwrap();
        let service = OrderService::new(&db, TransitionPolicy::Strict);
        let order = service.create(&alice(), large(2)).unwrap();

        let err = service
            .update_content(
                &alice(),
                order.id,
                UpdateOrderRequest {
                    quantity: Some(0),
                    pizza_size: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, OrderError::InvalidQuantity));
    }

    #[test]
    fn update_status_gates_on_staff_before_lookup() {
        let db = PizzaDatabase::in_memory().unwrap();
        let service = OrderService::new(&db, TransitionPolicy::Strict);
        let order = service.create(&alice(), large(2)).unwrap();

        // Owner is not enough
        assert!(matches!(
            service.update_status(&alice(), order.id, OrderStatus::Delivered),
            Err(OrderError::Forbidden(_))
        ));
        // Non-staff cannot probe for ids
        assert!(matches!(
            service.update_status(&bob(), 12345, OrderStatus::Delivered),
            Err(OrderError::Forbidden(_))
        ));
        assert!(matches!(
            service.update_status(&staff(), 12345, OrderStatus::Delivered),
            Err(OrderError::NotFound(12345))
        ));
    }

    #[test]
    fn strict_transitions_block_going_backwards() {
        let db = PizzaDatabase::in_memory().unwrap();
        let service = OrderService::new(&db, TransitionPolicy::Strict);
        let order = service.create(&alice(), large(2)).unwrap();

        let moved = service
            .update_status(&staff(), order.id, OrderStatus::InTransit)
            .unwrap();
        assert_eq!(moved.order_status, OrderStatus::InTransit);

        let err = service
            .update_status(&staff(), order.id, OrderStatus::Pending)
            .unwrap_err();
        assert!(matches!(
            err,
            OrderError::InvalidTransition {
                from: OrderStatus::InTransit,
                to: OrderStatus::Pending,
                ..
            }
        ));
        assert_eq!(
            service.get(&staff(), order.id).unwrap().order_status,
            OrderStatus::InTransit
        );
    }

    #[test]
    fn reasserting_status_leaves_record_untouched() {
        let db = PizzaDatabase::in_memory().unwrap();
        let service = OrderService::new(&db, TransitionPolicy::Strict);
        let order = service.create(&alice(), large(2)).unwrap();
        std::thread::sleep(Duration::from_millis(5));

        let same = service
            .update_status(&staff(), order.id, OrderStatus::Pending)
            .unwrap();

        assert_eq!(same, order);
        assert_eq!(service.get(&alice(), order.id).unwrap().updated_at, order.updated_at);
    }

    #[test]
    fn racing_status_and_content_updates_serialize() {
        for _ in 0..20 {
            let db = Arc::new(PizzaDatabase::in_memory().unwrap());
            let order = OrderService::new(&db, TransitionPolicy::Strict)
                .create(&alice(), large(2))
                .unwrap();
            let start = Arc::new(Barrier::new(2));

            let ship = {
                let db = Arc::clone(&db);
                let start = Arc::clone(&start);
                std::thread::spawn(move || {
                    start.wait();
                    OrderService::new(&db, TransitionPolicy::Strict)
                        .update_status(&staff(), order.id, OrderStatus::InTransit)
                })
            };
            let edit = {
                let db = Arc::clone(&db);
                let start = Arc::clone(&start);
                std::thread::spawn(move || {
                    start.wait();
                    OrderService::new(&db, TransitionPolicy::Strict).update_content(
                        &alice(),
                        order.id,
                        UpdateOrderRequest {
                            quantity: Some(5),
                            pizza_size: None,
                        },
                    )
                })
            };

            assert!(ship.join().unwrap().is_ok());
            let edited = edit.join().unwrap();
            let stored = OrderService::new(&db, TransitionPolicy::Strict)
                .get(&alice(), order.id)
                .unwrap();

            assert_eq!(stored.order_status, OrderStatus::InTransit);
            match edited {
                // Edit committed first, then the status change
                Ok(_) => assert_eq!(stored.quantity, 5),
                // Status change committed first, the edit saw a shipped order
                Err(OrderError::NotPending { .. }) => assert_eq!(stored.quantity, 2),
                Err(other) => panic!("unexpected edit outcome: {other:?}"),
            }
        }
    }

    #[test]
    fn permissive_transitions_allow_reopening() {
        let db = PizzaDatabase::in_memory().unwrap();
        let service = OrderService::new(&db, TransitionPolicy::Permissive);
        let order = service.create(&alice(), large(2)).unwrap();

        service
            .update_status(&staff(), order.id, OrderStatus::Delivered)
            .unwrap();
        let reopened = service
            .update_status(&staff(), order.id, OrderStatus::Pending)
            .unwrap();
        assert_eq!(reopened.order_status, OrderStatus::Pending);
    }

    #[test]
    fn delete_only_for_pending_owner() {
        let db = PizzaDatabase::in_memory().unwrap();
        let service = OrderService::new(&db, TransitionPolicy::Strict);
        let pending = service.create(&alice(), large(1)).unwrap();
        let shipped = service.create(&alice(), large(1)).unwrap();
        service
            .update_status(&staff(), shipped.id, OrderStatus::InTransit)
            .unwrap();

        assert!(matches!(
            service.delete(&bob(), pending.id),
            Err(OrderError::Forbidden(_))
        ));
        assert!(matches!(
            service.delete(&staff(), pending.id),
            Err(OrderError::Forbidden(_))
        ));
        assert!(matches!(
            service.delete(&alice(), shipped.id),
            Err(OrderError::NotPending {
                status: OrderStatus::InTransit,
                ..
            })
        ));
        assert!(matches!(
            service.delete(&bob(), shipped.id),
            Err(OrderError::Forbidden(_))
        ));

        service.delete(&alice(), pending.id).unwrap();
        assert!(matches!(
            service.get(&alice(), pending.id),
            Err(OrderError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(&alice(), pending.id),
            Err(OrderError::NotFound(_))
        ));
    }
}

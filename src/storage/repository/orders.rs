// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Order repository.
//!
//! Every order belongs to exactly one user. The `orders_by_user` index is
//! written in the same transaction as the order record.
//!
//! Mutations that depend on the current state of an order (`update_with`,
//! `delete_with`) take a check closure that runs against the freshly loaded
//! record inside the write transaction. If the closure fails, nothing is
//! committed.

use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};

use crate::orders::{OrderStatus, PizzaSize};
use crate::policy::OwnedResource;
use crate::storage::database::{
    next_id, read_json, DbError, DbResult, PizzaDatabase, ORDERS, ORDERS_BY_USER, ORDER_SEQUENCE,
};

/// Order record as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredOrder {
    /// Server-assigned identifier
    pub id: u64,
    /// Number of pizzas, always >= 1
    pub quantity: u32,
    pub pizza_size: PizzaSize,
    pub order_status: OrderStatus,
    /// Owning user
    pub user_id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OwnedResource for StoredOrder {
    fn owner_id(&self) -> u64 {
        self.user_id
    }
}

/// Fields supplied when inserting an order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub quantity: u32,
    pub pizza_size: PizzaSize,
    pub order_status: OrderStatus,
    pub user_id: u64,
}

/// Repository for order operations.
pub struct OrderRepository<'a> {
    db: &'a PizzaDatabase,
}

impl<'a> OrderRepository<'a> {
    pub fn new(db: &'a PizzaDatabase) -> Self {
        Self { db }
    }

    /// Insert a new order and its ownership index entry.
    pub fn create(&self, new_order: NewOrder) -> DbResult<StoredOrder> {
        let write_txn = self.db.inner().begin_write()?;
        let order = {
            let id = next_id(&write_txn, ORDER_SEQUENCE)?;
            let now = Utc::now();
            let order = StoredOrder {
                id,
                quantity: new_order.quantity,
                pizza_size: new_order.pizza_size,
                order_status: new_order.order_status,
                user_id: new_order.user_id,
                created_at: now,
                updated_at: now,
            };

            let json = serde_json::to_vec(&order)?;
            let mut orders = write_txn.open_table(ORDERS)?;
            orders.insert(id, json.as_slice())?;

            let mut by_user = write_txn.open_table(ORDERS_BY_USER)?;
            by_user.insert((order.user_id, id), ())?;

            order
        };
        write_txn.commit()?;

        Ok(order)
    }

    /// Get an order by id.
    pub fn get(&self, order_id: u64) -> DbResult<Option<StoredOrder>> {
        let read_txn = self.db.inner().begin_read()?;
        let orders = read_txn.open_table(ORDERS)?;
        read_json(&orders, order_id)
    }

    /// List all orders regardless of owner, ordered by id.
    pub fn list_all(&self) -> DbResult<Vec<StoredOrder>> {
        let read_txn = self.db.inner().begin_read()?;
        let orders = read_txn.open_table(ORDERS)?;

        let mut result = Vec::new();
        for entry in orders.iter()? {
            let (_, value) = entry?;
            result.push(serde_json::from_slice(value.value())?);
        }

        Ok(result)
    }

    /// List the orders owned by a user, ordered by id.
    pub fn list_by_user(&self, user_id: u64) -> DbResult<Vec<StoredOrder>> {
        let read_txn = self.db.inner().begin_read()?;
        let by_user = read_txn.open_table(ORDERS_BY_USER)?;
        let orders = read_txn.open_table(ORDERS)?;

        let mut result = Vec::new();
        for entry in by_user.range((user_id, 0)..=(user_id, u64::MAX))? {
            let (key, _) = entry?;
            let (_, order_id) = key.value();
            match read_json(&orders, order_id)? {
                Some(order) => result.push(order),
                None => tracing::warn!(user_id, order_id, "Dangling order index entry"),
            }
        }

        Ok(result)
    }

    /// Load, check and rewrite an order in a single write transaction.
    ///
    /// `apply` receives the current record and may mutate it; returning an
    /// error aborts the transaction. If `apply` leaves the record unchanged
    /// nothing is written and `updated_at` keeps its value. Returns `Ok(None)`
    /// if the order does not exist.
    pub fn update_with<E, F>(&self, order_id: u64, apply: F) -> Result<Option<StoredOrder>, E>
    where
        E: From<DbError>,
        F: FnOnce(&mut StoredOrder) -> Result<(), E>,
    {
        self.try_update_with(order_id, apply)?
    }

    fn try_update_with<E, F>(&self, order_id: u64, apply: F) -> DbResult<Result<Option<StoredOrder>, E>>
    where
        F: FnOnce(&mut StoredOrder) -> Result<(), E>,
    {
        let write_txn = self.db.inner().begin_write()?;
        let updated = {
            let mut orders = write_txn.open_table(ORDERS)?;
            let Some(mut order) = read_json::<StoredOrder, _>(&orders, order_id)? else {
                return Ok(Ok(None));
            };
            let current = order.clone();

            if let Err(e) = apply(&mut order) {
                return Ok(Err(e));
            }

            // Identity and ownership are immutable
            order.id = current.id;
            order.user_id = current.user_id;
            if order == current {
                return Ok(Ok(Some(current)));
            }
            order.updated_at = Utc::now();

            let json = serde_json::to_vec(&order)?;
            orders.insert(order_id, json.as_slice())?;
            order
        };
        write_txn.commit()?;

        Ok(Ok(Some(updated)))
    }

    /// Load, check and delete an order in a single write transaction.
    ///
    /// `check` runs against the current record; returning an error aborts the
    /// transaction. Returns the deleted order, or `Ok(None)` if it did not
    /// exist.
    pub fn delete_with<E, F>(&self, order_id: u64, check: F) -> Result<Option<StoredOrder>, E>
    where
        E: From<DbError>,
        F: FnOnce(&StoredOrder) -> Result<(), E>,
    {
        self.try_delete_with(order_id, check)?
    }

    fn try_delete_with<E, F>(&self, order_id: u64, check: F) -> DbResult<Result<Option<StoredOrder>, E>>
    where
        F: FnOnce(&StoredOrder) -> Result<(), E>,
    {
        let write_txn = self.db.inner().begin_write()?;
        let deleted = {
            let mut orders = write_txn.open_table(ORDERS)?;
            let Some(order) = read_json::<StoredOrder, _>(&orders, order_id)? else {
                return Ok(Ok(None));
            };

            if let Err(e) = check(&order) {
                return Ok(Err(e));
            }

            orders.remove(order_id)?;
            let mut by_user = write_txn.open_table(ORDERS_BY_USER)?;
            by_user.remove((order.user_id, order_id))?;
            order
        };
        write_txn.commit()?;

        Ok(Ok(Some(deleted)))
    }
}

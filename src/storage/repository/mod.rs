// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the database.
//!
//! Each repository provides CRUD operations for a specific entity type,
//! using the PizzaDatabase for all transactions.

pub mod orders;
pub mod users;

pub use orders::{NewOrder, OrderRepository, StoredOrder};
pub use users::{NewUser, StoredUser, UserRepository};

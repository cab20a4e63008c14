// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage for users and orders using **redb**, an embedded,
//! pure-Rust ACID key-value store.
//!
//! ## Transaction Scope
//!
//! There is no process-wide session. Each repository call opens its own
//! read or write transaction and releases it before returning:
//!
//! - reads use a snapshot `ReadTransaction`
//! - inserts and read-modify-write operations use one `WriteTransaction`
//!   which is committed on success and aborted (dropped) on every error path
//!
//! redb admits a single writer at a time, so two concurrent updates of the
//! same order are applied one after the other, each against the state the
//! previous one committed.

pub mod database;
pub mod repository;

pub use database::{DbError, DbResult, PizzaDatabase, UniqueField};
pub use repository::{NewOrder, NewUser, OrderRepository, StoredOrder, StoredUser, UserRepository};

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded order database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: user_id → serialized StoredUser
//! - `users_by_username`: username → user_id
//! - `users_by_email`: email → user_id
//! - `orders`: order_id → serialized StoredOrder
//! - `orders_by_user`: (user_id, order_id) → ()
//! - `sequences`: sequence name → last issued id
//!
//! Every public operation runs inside its own redb transaction. Write
//! transactions are serialised by redb, so a read-modify-write performed in
//! one write transaction cannot interleave with another writer. Dropping a
//! write transaction without `commit()` aborts it.

use std::path::Path;

use redb::{
    backends::InMemoryBackend, Database, ReadableDatabase, ReadableTable, TableDefinition,
    WriteTransaction,
};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: user_id → serialized StoredUser (JSON bytes).
pub(crate) const USERS: TableDefinition<u64, &[u8]> = TableDefinition::new("users");

/// Unique index: username → user_id. Exact, case-sensitive match.
pub(crate) const USERS_BY_USERNAME: TableDefinition<&str, u64> =
    TableDefinition::new("users_by_username");

/// Unique index: email → user_id. Exact, case-sensitive match.
pub(crate) const USERS_BY_EMAIL: TableDefinition<&str, u64> =
    TableDefinition::new("users_by_email");

/// Primary table: order_id → serialized StoredOrder (JSON bytes).
pub(crate) const ORDERS: TableDefinition<u64, &[u8]> = TableDefinition::new("orders");

/// Ownership index: (user_id, order_id) → (). Range-scanned per user.
pub(crate) const ORDERS_BY_USER: TableDefinition<(u64, u64), ()> =
    TableDefinition::new("orders_by_user");

/// Monotonic id sequences: name → last issued id.
const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

pub(crate) const USER_SEQUENCE: &str = "users";
pub(crate) const ORDER_SEQUENCE: &str = "orders";

// =============================================================================
// Error Type
// =============================================================================

/// Column with a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

impl std::fmt::Display for UniqueField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UniqueField::Username => write!(f, "username"),
            UniqueField::Email => write!(f, "email"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0} already exists")]
    UniqueViolation(UniqueField),
}

pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// PizzaDatabase
// =============================================================================

/// Embedded ACID store holding users and orders.
pub struct PizzaDatabase {
    db: Database,
}

impl PizzaDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> DbResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        Self::with_tables(Database::create(path)?)
    }

    /// Volatile database, used by tests and ephemeral deployments.
    pub fn in_memory() -> DbResult<Self> {
        let db = Database::builder().create_with_backend(InMemoryBackend::new())?;
        Self::with_tables(db)
    }

    fn with_tables(db: Database) -> DbResult<Self> {
        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USERS_BY_USERNAME)?;
            let _ = write_txn.open_table(USERS_BY_EMAIL)?;
            let _ = write_txn.open_table(ORDERS)?;
            let _ = write_txn.open_table(ORDERS_BY_USER)?;
            let _ = write_txn.open_table(SEQUENCES)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    pub(crate) fn inner(&self) -> &Database {
        &self.db
    }

    /// Verify that a read transaction can be opened against every table.
    pub fn health_check(&self) -> DbResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(USERS)?;
        let _ = read_txn.open_table(ORDERS)?;
        Ok(())
    }
}

/// Allocate the next id of `sequence` inside the caller's write transaction.
///
/// The id only becomes visible if the caller commits.
pub(crate) fn next_id(txn: &WriteTransaction, sequence: &str) -> DbResult<u64> {
    let mut table = txn.open_table(SEQUENCES)?;
    let next = table.get(sequence)?.map(|v| v.value()).unwrap_or(0) + 1;
    table.insert(sequence, next)?;
    Ok(next)
}

/// Decode a JSON record from a `u64 → bytes` table.
pub(crate) fn read_json<T, R>(table: &R, id: u64) -> DbResult<Option<T>>
where
    T: serde::de::DeserializeOwned,
    R: ReadableTable<u64, &'static [u8]>,
{
    match table.get(id)? {
        Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
        None => Ok(None),
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository.
//!
//! Users are created at sign-up and are immutable afterwards. Username and
//! email are unique (exact, case-sensitive match) and enforced through the
//! `users_by_username` / `users_by_email` index tables inside the same write
//! transaction that inserts the record.

use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};

use crate::storage::database::{
    next_id, read_json, DbError, DbResult, PizzaDatabase, UniqueField, USERS, USERS_BY_EMAIL,
    USERS_BY_USERNAME, USER_SEQUENCE,
};

/// User record as persisted. Never serialized to API clients directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    /// Server-assigned identifier
    pub id: u64,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string; the plaintext is never stored
    pub password_hash: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when inserting a user. The id is assigned on insert.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub is_active: bool,
}

/// Repository for user operations.
pub struct UserRepository<'a> {
    db: &'a PizzaDatabase,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a PizzaDatabase) -> Self {
        Self { db }
    }

    /// Insert a new user.
    ///
    /// Email uniqueness is checked before username uniqueness.
    ///
    /// # Errors
    /// `DbError::UniqueViolation` if the email or username is taken.
    pub fn create(&self, new_user: NewUser) -> DbResult<StoredUser> {
        let write_txn = self.db.inner().begin_write()?;
        let user = {
            let mut by_email = write_txn.open_table(USERS_BY_EMAIL)?;
            if by_email.get(new_user.email.as_str())?.is_some() {
                return Err(DbError::UniqueViolation(UniqueField::Email));
            }

            let mut by_username = write_txn.open_table(USERS_BY_USERNAME)?;
            if by_username.get(new_user.username.as_str())?.is_some() {
                return Err(DbError::UniqueViolation(UniqueField::Username));
            }

            let id = next_id(&write_txn, USER_SEQUENCE)?;
            let user = StoredUser {
                id,
                username: new_user.username,
                email: new_user.email,
                password_hash: new_user.password_hash,
                is_staff: new_user.is_staff,
                is_active: new_user.is_active,
                created_at: Utc::now(),
            };

            by_email.insert(user.email.as_str(), id)?;
            by_username.insert(user.username.as_str(), id)?;

            let json = serde_json::to_vec(&user)?;
            let mut users = write_txn.open_table(USERS)?;
            users.insert(id, json.as_slice())?;

            user
        };
        write_txn.commit()?;

        Ok(user)
    }

    /// Get a user by id.
    pub fn get(&self, user_id: u64) -> DbResult<Option<StoredUser>> {
        let read_txn = self.db.inner().begin_read()?;
        let users = read_txn.open_table(USERS)?;
        read_json(&users, user_id)
    }

    /// Look up a user by exact username.
    pub fn find_by_username(&self, username: &str) -> DbResult<Option<StoredUser>> {
        let read_txn = self.db.inner().begin_read()?;
        let by_username = read_txn.open_table(USERS_BY_USERNAME)?;
        let Some(user_id) = by_username.get(username)?.map(|v| v.value()) else {
            return Ok(None);
        };

        let users = read_txn.open_table(USERS)?;
        read_json(&users, user_id)
    }

    /// List every user, ordered by id.
    pub fn list_all(&self) -> DbResult<Vec<StoredUser>> {
        let read_txn = self.db.inner().begin_read()?;
        let users = read_txn.open_table(USERS)?;

        let mut result = Vec::new();
        for entry in users.iter()? {
            let (_, value) = entry?;
            result.push(serde_json::from_slice(value.value())?);
        }

        Ok(result)
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use chrono::Duration;

use crate::{
    auth::{AuthService, TokenService},
    config::AppConfig,
    orders::{OrderService, TransitionPolicy},
    storage::{DbResult, PizzaDatabase},
};

/// Shared handler state. Cloning is cheap; the database and token keys are
/// behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<PizzaDatabase>,
    pub tokens: Arc<TokenService>,
    pub transitions: TransitionPolicy,
}

impl AppState {
    pub fn new(db: PizzaDatabase, tokens: TokenService, transitions: TransitionPolicy) -> Self {
        Self {
            db: Arc::new(db),
            tokens: Arc::new(tokens),
            transitions,
        }
    }

    /// Open the on-disk database and build token keys from `config`.
    pub fn from_config(config: &AppConfig) -> DbResult<Self> {
        let db = PizzaDatabase::open(&config.database_path)?;
        let tokens = TokenService::new(config.secret_key.as_bytes()).with_lifetimes(
            Duration::seconds(config.access_token_ttl_secs),
            Duration::seconds(config.refresh_token_ttl_secs),
        );
        Ok(Self::new(db, tokens, config.transitions))
    }

    /// Fresh in-memory database with default token lifetimes and strict
    /// transitions.
    pub fn in_memory(secret: &[u8]) -> DbResult<Self> {
        Ok(Self::new(
            PizzaDatabase::in_memory()?,
            TokenService::new(secret),
            TransitionPolicy::default(),
        ))
    }

    pub fn auth_service(&self) -> AuthService<'_> {
        AuthService::new(&self.db, &self.tokens)
    }

    pub fn order_service(&self) -> OrderService<'_> {
        OrderService::new(&self.db, self.transitions)
    }
}

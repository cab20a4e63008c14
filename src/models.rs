// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the request and response data structures used by
//! the REST API. All types derive `ToSchema` for OpenAPI documentation.
//!
//! Stored records (`StoredUser`, `StoredOrder`) never leave the server
//! as-is; they are converted to [`UserSummary`] and [`OrderView`], which
//! omit the password hash.
//!
//! ## Model Categories
//!
//! - **Auth**: sign-up, login, token responses, user summaries
//! - **Orders**: creation, partial update, status change, order views

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::orders::{OrderStatus, PizzaSize};
use crate::storage::{StoredOrder, StoredUser};

// =============================================================================
// Auth Models
// =============================================================================

/// Request body for `POST /api/auth/signup`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "username": "johndoe",
    "email": "johndoe@gmail.com",
    "password": "password",
    "is_staff": false,
    "is_active": true
}))]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Defaults to `false`
    #[serde(default)]
    pub is_staff: Option<bool>,
    /// Defaults to `true`
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Access and refresh token issued at login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Always `bearer`
    pub token_type: String,
}

/// Fresh access token minted from a refresh token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccessTokenResponse {
    pub access_token: String,
    /// Always `bearer`
    pub token_type: String,
}

/// Public view of a user. The password hash is never exposed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserSummary {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub is_staff: bool,
    pub is_active: bool,
}

impl From<StoredUser> for UserSummary {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_staff: user.is_staff,
            is_active: user.is_active,
        }
    }
}

// =============================================================================
// Order Models
// =============================================================================

/// Request body for `POST /api/orders/order`.
///
/// The owner is always the caller and the initial status is always
/// `PENDING`; any `order_status` or `user_id` in the body is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"quantity": 2, "pizza_size": "LARGE"}))]
pub struct CreateOrderRequest {
    /// Number of pizzas, at least 1
    pub quantity: u32,
    /// Defaults to `SMALL`
    #[serde(default)]
    pub pizza_size: Option<PizzaSize>,
}

/// Request body for `PATCH /api/orders/order/update/{id}`.
///
/// Omitted fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"quantity": 5}))]
pub struct UpdateOrderRequest {
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub pizza_size: Option<PizzaSize>,
}

/// Request body for `PUT /api/orders/order/status/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"order_status": "IN_TRANSIT"}))]
pub struct UpdateOrderStatusRequest {
    pub order_status: OrderStatus,
}

/// Order as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct OrderView {
    pub id: u64,
    pub quantity: u32,
    pub pizza_size: PizzaSize,
    pub order_status: OrderStatus,
    /// Owning user
    pub user_id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StoredOrder> for OrderView {
    fn from(order: StoredOrder) -> Self {
        Self {
            id: order.id,
            quantity: order.quantity,
            pizza_size: order.pizza_size,
            order_status: order.order_status,
            user_id: order.user_id,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

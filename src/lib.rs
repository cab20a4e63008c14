// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Pizza Delivery - Ordering Backend
//!
//! Customers sign up, log in with JWT sessions and place pizza orders; staff
//! see every order and move orders through their delivery status.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum) and OpenAPI document
//! - `auth` - Password accounts, JWT issuance and request authentication
//! - `orders` - Order status machine and lifecycle operations
//! - `policy` - Ownership and role rules for every order operation
//! - `storage` - redb-backed user and order stores

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod orders;
pub mod policy;
pub mod state;
pub mod storage;

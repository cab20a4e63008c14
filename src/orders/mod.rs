// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Orders Module
//!
//! Order lifecycle: creation, retrieval, content edits while pending, staff
//! status changes and owner deletion while pending. Authorization decisions
//! are delegated to [`crate::policy`].

pub mod error;
pub mod service;
pub mod status;

pub use error::OrderError;
pub use service::OrderService;
pub use status::{OrderStatus, PizzaSize, TransitionPolicy};

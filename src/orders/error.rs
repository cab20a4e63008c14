// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Order lifecycle errors.

use crate::policy::Denial;
use crate::storage::DbError;

use super::OrderStatus;

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Order {0} not found")]
    NotFound(u64),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("Order {order_id} can no longer be changed: status is {status}")]
    NotPending { order_id: u64, status: OrderStatus },

    #[error("Order {order_id} cannot move from {from} to {to}")]
    InvalidTransition {
        order_id: u64,
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    #[error("storage failure: {0}")]
    Storage(#[from] DbError),
}

impl OrderError {
    /// Translate a policy denial on `order_id` into the caller-facing error.
    pub fn from_denial(denial: Denial, order_id: u64, forbidden: &'static str) -> Self {
        match denial {
            Denial::Forbidden => OrderError::Forbidden(forbidden),
            Denial::Concealed => OrderError::NotFound(order_id),
            Denial::NotPending(status) => OrderError::NotPending { order_id, status },
        }
    }
}

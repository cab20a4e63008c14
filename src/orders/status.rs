// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Order status, pizza size and the status transition table.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle state of an order.
///
/// ## Transitions
///
/// ```text
/// PENDING ──► IN_TRANSIT ──► DELIVERED
///    └────────────────────────▲
/// ```
///
/// Content edits and deletion are only possible while `PENDING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Placed, still editable by its owner
    Pending,
    /// Out for delivery
    #[serde(alias = "IN-TRANSIT")]
    InTransit,
    /// Handed over to the customer
    Delivered,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 3] = [
        OrderStatus::Pending,
        OrderStatus::InTransit,
        OrderStatus::Delivered,
    ];

    pub fn is_pending(&self) -> bool {
        *self == OrderStatus::Pending
    }

    /// Statuses reachable from this one under the strict policy.
    pub fn successors(&self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[OrderStatus::InTransit, OrderStatus::Delivered],
            OrderStatus::InTransit => &[OrderStatus::Delivered],
            OrderStatus::Delivered => &[],
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "PENDING"),
            OrderStatus::InTransit => write!(f, "IN_TRANSIT"),
            OrderStatus::Delivered => write!(f, "DELIVERED"),
        }
    }
}

/// Pizza size offered on the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PizzaSize {
    #[default]
    Small,
    Medium,
    Large,
    #[serde(alias = "EXTRA-LARGE")]
    ExtraLarge,
}

impl std::fmt::Display for PizzaSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PizzaSize::Small => write!(f, "SMALL"),
            PizzaSize::Medium => write!(f, "MEDIUM"),
            PizzaSize::Large => write!(f, "LARGE"),
            PizzaSize::ExtraLarge => write!(f, "EXTRA_LARGE"),
        }
    }
}

/// Which status changes staff may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    /// Only moves listed in [`OrderStatus::successors`], plus re-asserting
    /// the current status.
    #[default]
    Strict,
    /// Any status may be set from any status.
    Permissive,
}

impl TransitionPolicy {
    pub fn allows(&self, from: OrderStatus, to: OrderStatus) -> bool {
        match self {
            TransitionPolicy::Permissive => true,
            TransitionPolicy::Strict => from == to || from.successors().contains(&to),
        }
    }

    /// Parse from configuration (case-insensitive).
    pub fn parse(s: &str) -> Option<TransitionPolicy> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Some(TransitionPolicy::Strict),
            "permissive" => Some(TransitionPolicy::Permissive),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_format() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::InTransit).unwrap(),
            r#""IN_TRANSIT""#
        );
        let legacy: OrderStatus = serde_json::from_str(r#""IN-TRANSIT""#).unwrap();
        assert_eq!(legacy, OrderStatus::InTransit);
        assert!(serde_json::from_str::<OrderStatus>(r#""LOST""#).is_err());
    }

    #[test]
    fn size_wire_format() {
        assert_eq!(
            serde_json::to_string(&PizzaSize::ExtraLarge).unwrap(),
            r#""EXTRA_LARGE""#
        );
        let legacy: PizzaSize = serde_json::from_str(r#""EXTRA-LARGE""#).unwrap();
        assert_eq!(legacy, PizzaSize::ExtraLarge);
        assert_eq!(PizzaSize::default(), PizzaSize::Small);
    }

    #[test]
    fn display_matches_wire_format() {
        for status in OrderStatus::ALL {
            assert_eq!(
                serde_json::to_string(&status).unwrap(),
                format!("\"{status}\"")
            );
        }
    }

    #[test]
    fn strict_policy_follows_transition_table() {
        let strict = TransitionPolicy::Strict;
        assert!(strict.allows(OrderStatus::Pending, OrderStatus::InTransit));
        assert!(strict.allows(OrderStatus::Pending, OrderStatus::Delivered));
        assert!(strict.allows(OrderStatus::InTransit, OrderStatus::Delivered));
        assert!(!strict.allows(OrderStatus::Delivered, OrderStatus::Pending));
        assert!(!strict.allows(OrderStatus::InTransit, OrderStatus::Pending));
        assert!(!strict.allows(OrderStatus::Delivered, OrderStatus::InTransit));
    }

    #[test]
    fn reasserting_status_is_allowed() {
        for status in OrderStatus::ALL {
            assert!(TransitionPolicy::Strict.allows(status, status));
        }
    }

    #[test]
    fn permissive_policy_allows_everything() {
        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                assert!(TransitionPolicy::Permissive.allows(from, to));
            }
        }
    }

    #[test]
    fn policy_parses_config_values() {
        assert_eq!(TransitionPolicy::parse("STRICT"), Some(TransitionPolicy::Strict));
        assert_eq!(
            TransitionPolicy::parse("permissive"),
            Some(TransitionPolicy::Permissive)
        );
        assert_eq!(TransitionPolicy::parse("lenient"), None);
    }
}

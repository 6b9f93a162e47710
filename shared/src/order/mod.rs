//! Order record and status state machine
//!
//! An order's items and total are frozen at creation; only `status`
//! (and `completed_at`, stamped on the transition to Ready) ever change.
//! Transitions are one-directional and validated against an explicit
//! table — terminal states never reopen.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::MenuItem;

/// Order status
///
/// ```text
/// pending ──► preparing ──► ready      (terminal)
///    └──────► rejected                 (terminal)
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Rejected,
}

impl OrderStatus {
    /// Whether this status admits no further transitions
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Rejected)
    }

    /// The explicit transition table
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Preparing)
                | (Self::Pending, Self::Rejected)
                | (Self::Preparing, Self::Ready)
        )
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Server-assigned document id
    pub id: String,
    /// Item snapshots copied at cart-add time; later menu edits do not
    /// retroactively change past orders
    pub items: Vec<MenuItem>,
    /// Sum of item prices at order time
    pub total: i64,
    pub status: OrderStatus,
    /// Student email — the filter key, not the auth UID
    pub student_id: String,
    /// Display label, "Full Name (ID)" or email
    pub student_name: String,
    /// Display snapshot of the canteen name, not a live reference
    pub canteen_name: String,
    /// Optional special request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// 4-digit display token, not guaranteed unique
    pub token_id: u32,
    pub timestamp: DateTime<Utc>,
    /// Set only on the transition to Ready
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Apply a status transition, validating against the table
    ///
    /// `preparing -> ready` additionally stamps `completed_at`.
    pub fn transition(&mut self, next: OrderStatus, now: DateTime<Utc>) -> AppResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(AppError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        if next == OrderStatus::Ready {
            self.completed_at = Some(now);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_order(status: OrderStatus) -> Order {
        Order {
            id: "order-1".to_string(),
            items: vec![MenuItem::new("Masala Chai", 15)],
            total: 15,
            status,
            student_id: "asha@campus.edu".to_string(),
            student_name: "Asha Rao (CS-042)".to_string(),
            canteen_name: "Main Canteen".to_string(),
            note: None,
            token_id: 4242,
            timestamp: Utc::now(),
            completed_at: None,
        }
    }

    #[test]
    fn forward_transitions_allowed() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Preparing));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Rejected));
        assert!(OrderStatus::Preparing.can_transition_to(OrderStatus::Ready));
    }

    #[test]
    fn terminal_states_never_reopen() {
        for from in [OrderStatus::Ready, OrderStatus::Rejected] {
            for to in [
                OrderStatus::Pending,
                OrderStatus::Preparing,
                OrderStatus::Ready,
                OrderStatus::Rejected,
            ] {
                assert!(!from.can_transition_to(to), "{from:?} -> {to:?} must be rejected");
            }
        }
    }

    #[test]
    fn backward_transition_rejected() {
        let mut order = make_order(OrderStatus::Ready);
        let err = order.transition(OrderStatus::Pending, Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidTransition {
                from: OrderStatus::Ready,
                to: OrderStatus::Pending
            }
        ));
        assert_eq!(order.status, OrderStatus::Ready);
    }

    #[test]
    fn ready_transition_stamps_completed_at() {
        let mut order = make_order(OrderStatus::Preparing);
        let now = Utc::now();
        order.transition(OrderStatus::Ready, now).unwrap();
        assert_eq!(order.status, OrderStatus::Ready);
        assert_eq!(order.completed_at, Some(now));
    }

    #[test]
    fn rejection_leaves_completed_at_unset() {
        let mut order = make_order(OrderStatus::Pending);
        order.transition(OrderStatus::Rejected, Utc::now()).unwrap();
        assert!(order.completed_at.is_none());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Preparing).unwrap(),
            r#""preparing""#
        );
        let status: OrderStatus = serde_json::from_str(r#""ready""#).unwrap();
        assert_eq!(status, OrderStatus::Ready);
    }
}

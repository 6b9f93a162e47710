//! Edge-triggered order status notifications
//!
//! The tracker maps order id -> last-observed status for the lifetime
//! of a session. Diffing a snapshot against it yields exactly one
//! notice per transition: nothing on first observation (no notification
//! storm on initial load or reconnect) and nothing for an unchanged
//! status. The stored status is updated whether or not a notice fired.

use std::collections::HashMap;

use shared::{Order, OrderStatus};

/// One user-facing status-change notice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusNotice {
    pub order_id: String,
    /// Display token of the affected order
    pub token_id: u32,
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub message: String,
}

/// Session-lifetime map of last-observed order statuses
///
/// Constructed once per session and passed by reference into the feed's
/// diff step; dropping it (logout) forgets all observed statuses.
#[derive(Debug, Default)]
pub struct StatusTracker {
    last_seen: HashMap<String, OrderStatus>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff a snapshot of the student's orders against the last-observed
    /// statuses, returning the notices to surface
    pub fn diff(&mut self, orders: &[Order]) -> Vec<StatusNotice> {
        let mut notices = Vec::new();
        for order in orders {
            match self.last_seen.insert(order.id.clone(), order.status) {
                // First observation: record silently
                None => {}
                Some(previous) if previous == order.status => {}
                Some(previous) => {
                    if let Some(message) = transition_message(order.status, order.token_id) {
                        notices.push(StatusNotice {
                            order_id: order.id.clone(),
                            token_id: order.token_id,
                            from: previous,
                            to: order.status,
                            message,
                        });
                    }
                }
            }
        }
        notices
    }
}

fn transition_message(to: OrderStatus, token_id: u32) -> Option<String> {
    match to {
        OrderStatus::Preparing => Some(format!("Order #{token_id}: kitchen accepted")),
        OrderStatus::Ready => Some(format!("Order #{token_id}: ready for pickup")),
        OrderStatus::Rejected => Some(format!("Order #{token_id}: rejected")),
        OrderStatus::Pending => None,
    }
}

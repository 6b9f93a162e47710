//! Order placement workflow and status updates
//!
//! # Placement flow
//!
//! ```text
//! place_order(session, user, canteens)
//!     ├─ 1. Selected canteen still open in the live snapshot?
//!     ├─ 2. Cart non-empty?
//!     ├─ 3. Wallet loaded?
//!     ├─ 4. Balance covers the total?
//!     ├─ 5. Token + student label + order record
//!     ├─ 6. Atomic wallet debit + order insert
//!     └─ 7. Session cleanup (cart, note, canteen, view)
//! ```
//!
//! Preconditions are checked in order; the first failure wins and no
//! write is issued. The debit + insert pair is a single store unit, so a
//! failed placement never leaves a charge without an order.

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;

use shared::{AppError, AppResult, Canteen, Order, OrderStatus, User};

use crate::config::{ClientConfig, FALLBACK_CANTEEN_NAME};
use crate::session::Session;
use crate::store::CanteenStore;
use crate::wallet::WalletLedger;

/// Result of a successful placement, for the confirmation notice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub order_id: String,
    /// 4-digit display token
    pub token_id: u32,
    pub new_balance: i64,
    /// Kitchen estimate relayed to the student, when one was shown
    pub wait_estimate_min: Option<u32>,
}

/// Order workflow engine
pub struct OrderWorkflow {
    store: Arc<dyn CanteenStore>,
    ledger: WalletLedger,
}

impl OrderWorkflow {
    pub fn new(store: Arc<dyn CanteenStore>, config: &ClientConfig) -> Self {
        let ledger = WalletLedger::new(store.clone(), config.signup_bonus);
        Self { store, ledger }
    }

    pub fn ledger(&self) -> &WalletLedger {
        &self.ledger
    }

    /// Validate and place the session's cart as an order
    ///
    /// `canteens` is the live canteen snapshot; the selected canteen's
    /// open flag is read from it, not from whatever the student saw
    /// when the cart was built.
    pub async fn place_order(
        &self,
        session: &mut Session,
        user: &User,
        canteens: &[Canteen],
        wait_estimate_min: Option<u32>,
    ) -> AppResult<PlacedOrder> {
        // 1. Shop gate against the live copy; missing means closed
        let selected = match session.selected_canteen() {
            Some(id) => match canteens.iter().find(|c| c.id == id) {
                Some(canteen) if canteen.is_open => Some(canteen),
                _ => return Err(AppError::ShopClosed),
            },
            None => None,
        };

        // 2. Cart
        if session.cart().is_empty() {
            return Err(AppError::EmptyCart);
        }

        // 3. Wallet must be loaded before the funds check is meaningful
        let Some(balance) = user.wallet_balance else {
            return Err(AppError::DataNotReady);
        };

        // 4. Funds
        let total = session.cart_total();
        if balance < total {
            return Err(AppError::InsufficientFunds {
                balance,
                required: total,
            });
        }

        // 5. Token is a display convenience, not a key — collisions are fine
        let token_id = generate_token();
        let order = Order {
            id: String::new(),
            items: session.cart().to_vec(),
            total,
            status: OrderStatus::Pending,
            student_id: user.email.clone(),
            student_name: user.display_label(),
            canteen_name: selected
                .map(|c| c.name.clone())
                .unwrap_or_else(|| FALLBACK_CANTEEN_NAME.to_string()),
            note: session.note(),
            token_id,
            timestamp: Utc::now(),
            completed_at: None,
        };

        // 6. Atomic debit + insert
        let (new_balance, order_id) = self.ledger.debit_for_order(user, order).await?;

        tracing::info!(
            order_id = %order_id,
            token_id,
            total,
            new_balance,
            "Order placed"
        );

        // 7. Cleanup
        session.after_placement();

        Ok(PlacedOrder {
            order_id,
            token_id,
            new_balance,
            wait_estimate_min,
        })
    }

    /// Apply a shopkeeper status transition, enforcing the table
    ///
    /// `preparing -> ready` stamps `completed_at` with the call instant.
    pub async fn update_status(&self, order_id: &str, next: OrderStatus) -> AppResult<Order> {
        let mut order = self.store.get_order(order_id).await?;
        order.transition(next, Utc::now())?;
        self.store
            .update_order_status(order_id, order.status, order.completed_at)
            .await?;

        tracing::info!(
            order_id = %order_id,
            status = ?order.status,
            "Order status updated"
        );
        Ok(order)
    }
}

/// Uniform random 4-digit token in [1000, 9999]
fn generate_token() -> u32 {
    rand::thread_rng().gen_range(1000..10000)
}

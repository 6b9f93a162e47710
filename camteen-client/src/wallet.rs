//! Wallet ledger
//!
//! A student's wallet is an integer balance on their user document. It
//! is only ever credited twice: the fixed signup bonus at account
//! creation, and the lazy backfill that migrates legacy documents
//! missing the field. The only debit path runs inside the store's
//! atomic placement unit, so a charge without an order cannot happen.

use std::sync::Arc;

use shared::{AppResult, Order, User};

use crate::store::CanteenStore;

/// Wallet ledger over the document store
pub struct WalletLedger {
    store: Arc<dyn CanteenStore>,
    signup_bonus: i64,
}

impl WalletLedger {
    pub fn new(store: Arc<dyn CanteenStore>, signup_bonus: i64) -> Self {
        Self {
            store,
            signup_bonus,
        }
    }

    /// Debit the order total and insert the order as one unit
    ///
    /// Returns the new balance and the server-assigned order id.
    pub async fn debit_for_order(&self, user: &User, order: Order) -> AppResult<(i64, String)> {
        let total = order.total;
        let (new_balance, order_id) = self.store.place_order(&user.id, total, order).await?;
        tracing::debug!(uid = %user.id, total, new_balance, "Wallet debited");
        Ok((new_balance, order_id))
    }

    /// Migrate a legacy user document missing the wallet field
    ///
    /// Returns the effective balance either way. Called on first
    /// observation of the profile after sign-in.
    pub async fn backfill_if_missing(&self, user: &mut User) -> AppResult<i64> {
        match user.wallet_balance {
            Some(balance) => Ok(balance),
            None => {
                self.store
                    .update_balance(&user.id, self.signup_bonus)
                    .await?;
                user.wallet_balance = Some(self.signup_bonus);
                tracing::info!(uid = %user.id, bonus = self.signup_bonus, "Backfilled legacy wallet");
                Ok(self.signup_bonus)
            }
        }
    }
}

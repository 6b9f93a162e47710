//! Unified error types for the ordering workflow
//!
//! Every failure is non-fatal and reported to the user as a transient
//! notice; nothing here aborts the event loop.

use thiserror::Error;

use crate::order::OrderStatus;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// The selected canteen is closed or no longer exists
    #[error("Shop is closed")]
    ShopClosed,

    /// Order placement attempted with an empty cart
    #[error("Cart is empty")]
    EmptyCart,

    /// Wallet data has not been loaded yet
    #[error("Account data not ready, try again in a moment")]
    DataNotReady,

    /// Wallet balance cannot cover the cart total
    #[error("Insufficient funds: balance {balance}, required {required}")]
    InsufficientFunds { balance: i64, required: i64 },

    /// Sign-in rejected by the identity provider
    #[error("Invalid credentials")]
    AuthInvalidCredentials,

    /// Signup passwords do not match
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// The atomic debit + insert unit failed; no partial state was applied
    #[error("Order transaction failed: {0}")]
    TransactionFailed(String),

    /// Generic store write failure (menu and item mutations)
    #[error("Store write failed: {0}")]
    StoreWriteFailed(String),

    /// Document not found
    #[error("{0} not found")]
    NotFound(String),

    /// Rejected order status transition
    #[error("Illegal status transition: {from:?} -> {to:?}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
}

impl AppError {
    /// Create a TransactionFailed error
    pub fn transaction(message: impl Into<String>) -> Self {
        Self::TransactionFailed(message.into())
    }

    /// Create a StoreWriteFailed error
    pub fn store_write(message: impl Into<String>) -> Self {
        Self::StoreWriteFailed(message.into())
    }

    /// Create a NotFound error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }
}

/// Result type for workflow operations
pub type AppResult<T> = Result<T, AppError>;

//! Client-side engine for the CAMTEEN campus canteen ordering system
//!
//! All persistent state lives in an external document store reached
//! through the [`store::CanteenStore`] trait; authentication is delegated
//! to a [`store::IdentityProvider`]. The engine owns the pieces with real
//! invariants: the order placement workflow with its atomic wallet debit,
//! the order status state machine and its edge-triggered change notices,
//! the analytics aggregation over order snapshots, and the shop/item
//! availability gate.
//!
//! Everything is event-driven: the store pushes the full collection on
//! every change, [`feeds`] fans the snapshots into the session, and user
//! actions issue attempt-once writes back through the store.

pub mod analytics;
pub mod auth;
pub mod config;
pub mod feeds;
pub mod gate;
pub mod orders;
pub mod session;
pub mod store;
pub mod wallet;

// Re-exports
pub use analytics::StatsBundle;
pub use auth::AuthFlow;
pub use config::ClientConfig;
pub use feeds::FeedSet;
pub use gate::AvailabilityGate;
pub use orders::{OrderWorkflow, PlacedOrder, StatusNotice, StatusTracker};
pub use session::Session;
pub use store::{AuthUser, CanteenStore, IdentityProvider, OrderFilter};
pub use wallet::WalletLedger;

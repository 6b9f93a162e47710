//! Shared types for the CAMTEEN ordering system
//!
//! Entity models, the order status state machine, and the unified
//! error types used across the workspace.

pub mod error;
pub mod models;
pub mod order;

// Re-exports
pub use error::{AppError, AppResult};
pub use models::{Canteen, MenuItem, Role, User};
pub use order::{Order, OrderStatus};
pub use serde::{Deserialize, Serialize};

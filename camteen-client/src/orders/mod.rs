//! Order lifecycle: placement workflow and status-change tracking

mod tracker;
mod workflow;

pub use tracker::{StatusNotice, StatusTracker};
pub use workflow::{OrderWorkflow, PlacedOrder};

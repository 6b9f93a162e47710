//! External collaborator seams
//!
//! The document store and the identity provider are not implemented by
//! this system; the engine talks to them through these traits. The store
//! pushes the full collection on every change (a "snapshot") through
//! broadcast channels, and every write is attempt-once with no retries.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use shared::{AppResult, Canteen, MenuItem, Order, OrderStatus, User};

pub use memory::{MemoryIdentity, MemoryStore};

/// Which orders a role-scoped consumer sees
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderFilter {
    /// Every order (shopkeeper queue)
    All,
    /// Orders whose `student_id` equals this email
    Student(String),
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        match self {
            Self::All => true,
            Self::Student(email) => order.student_id == *email,
        }
    }
}

/// Document store collaborator
///
/// `place_order` is the one multi-document unit of work: the wallet
/// debit and the order insert commit or fail together. Menu mutations
/// follow the store's data model — array union/remove by value equality,
/// or a whole-array rewrite when a single element changes.
#[async_trait]
pub trait CanteenStore: Send + Sync {
    /// Live canteen collection; a full snapshot is pushed on every change
    fn subscribe_canteens(&self) -> broadcast::Receiver<Vec<Canteen>>;

    /// Live order collection, unfiltered; consumers filter by role
    fn subscribe_orders(&self) -> broadcast::Receiver<Vec<Order>>;

    /// Current canteen collection (initial snapshot for new subscribers)
    async fn canteens(&self) -> Vec<Canteen>;

    /// Current order collection (initial snapshot for new subscribers)
    async fn orders(&self) -> Vec<Order>;

    async fn get_user(&self, uid: &str) -> AppResult<Option<User>>;

    async fn create_user(&self, user: &User) -> AppResult<()>;

    /// Overwrite a user's wallet balance (signup bonus backfill)
    async fn update_balance(&self, uid: &str, balance: i64) -> AppResult<()>;

    /// Atomically debit `total` from the user's wallet and insert the
    /// order. Returns the new balance and the server-assigned order id.
    /// On failure neither write is applied.
    async fn place_order(&self, uid: &str, total: i64, order: Order)
        -> AppResult<(i64, String)>;

    async fn get_order(&self, order_id: &str) -> AppResult<Order>;

    /// Write an order's status and completion stamp. Transition
    /// validation happens in the workflow before this is called.
    async fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> AppResult<()>;

    /// Append a menu item unless an equal one is already present
    async fn menu_array_union(&self, canteen_id: &str, item: MenuItem) -> AppResult<()>;

    /// Remove every menu item equal to `item`
    async fn menu_array_remove(&self, canteen_id: &str, item: &MenuItem) -> AppResult<()>;

    /// Replace the whole menu array — the unit of update for flipping a
    /// single item's availability
    async fn set_menu(&self, canteen_id: &str, menu: Vec<MenuItem>) -> AppResult<()>;

    async fn set_canteen_open(&self, canteen_id: &str, is_open: bool) -> AppResult<()>;
}

/// Authenticated principal delivered by the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
}

/// Identity collaborator
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthUser>;

    /// Register a new account and return its UID
    async fn sign_up(&self, email: &str, password: &str) -> AppResult<AuthUser>;

    async fn sign_out(&self);

    /// Auth-state changes: `Some` on sign-in, `None` on sign-out
    fn subscribe(&self) -> broadcast::Receiver<Option<AuthUser>>;
}

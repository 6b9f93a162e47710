//! In-process reference implementations of the collaborator traits
//!
//! `MemoryStore` keeps every collection in memory and fans the full
//! collection out to subscribers on every change, which is exactly the
//! contract the external document store provides. The debit + insert
//! pair in `place_order` runs under one lock so it commits or fails as
//! a unit. Used by the test suites.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;

use shared::{AppError, AppResult, Canteen, MenuItem, Order, OrderStatus, User};

use super::{AuthUser, CanteenStore, IdentityProvider};

/// Snapshot fan-out capacity — ample for a single-client event loop
const SNAPSHOT_CAPACITY: usize = 64;

/// In-memory document store
pub struct MemoryStore {
    canteens: RwLock<Vec<Canteen>>,
    users: DashMap<String, User>,
    orders: RwLock<Vec<Order>>,
    canteen_tx: broadcast::Sender<Vec<Canteen>>,
    order_tx: broadcast::Sender<Vec<Order>>,
    /// Serializes the wallet debit + order insert pair
    placement: Mutex<()>,
    /// Test hook: make the next placement fail at commit time
    fail_next_placement: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (canteen_tx, _) = broadcast::channel(SNAPSHOT_CAPACITY);
        let (order_tx, _) = broadcast::channel(SNAPSHOT_CAPACITY);
        Self {
            canteens: RwLock::new(Vec::new()),
            users: DashMap::new(),
            orders: RwLock::new(Vec::new()),
            canteen_tx,
            order_tx,
            placement: Mutex::new(()),
            fail_next_placement: AtomicBool::new(false),
        }
    }

    /// Seed a canteen document (test setup)
    pub fn seed_canteen(&self, canteen: Canteen) {
        self.canteens.write().push(canteen);
        self.push_canteens();
    }

    /// Seed a user document as-is, without the signup path (test setup
    /// for legacy documents)
    pub fn seed_user(&self, user: User) {
        self.users.insert(user.id.clone(), user);
    }

    /// Seed an order document as-is, bypassing placement (test setup)
    pub fn seed_order(&self, order: Order) {
        self.orders.write().push(order);
        self.push_orders();
    }

    /// Make the next `place_order` fail before any write is applied
    pub fn fail_next_placement(&self) {
        self.fail_next_placement.store(true, Ordering::SeqCst);
    }

    fn push_canteens(&self) {
        let snapshot = self.canteens.read().clone();
        // No receivers is fine
        let _ = self.canteen_tx.send(snapshot);
    }

    fn push_orders(&self) {
        let snapshot = self.orders.read().clone();
        let _ = self.order_tx.send(snapshot);
    }

    fn with_canteen<T>(
        &self,
        canteen_id: &str,
        f: impl FnOnce(&mut Canteen) -> T,
    ) -> AppResult<T> {
        let mut canteens = self.canteens.write();
        let canteen = canteens
            .iter_mut()
            .find(|c| c.id == canteen_id)
            .ok_or_else(|| AppError::not_found("Canteen"))?;
        Ok(f(canteen))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CanteenStore for MemoryStore {
    fn subscribe_canteens(&self) -> broadcast::Receiver<Vec<Canteen>> {
        self.canteen_tx.subscribe()
    }

    fn subscribe_orders(&self) -> broadcast::Receiver<Vec<Order>> {
        self.order_tx.subscribe()
    }

    async fn canteens(&self) -> Vec<Canteen> {
        self.canteens.read().clone()
    }

    async fn orders(&self) -> Vec<Order> {
        self.orders.read().clone()
    }

    async fn get_user(&self, uid: &str) -> AppResult<Option<User>> {
        Ok(self.users.get(uid).map(|u| u.clone()))
    }

    async fn create_user(&self, user: &User) -> AppResult<()> {
        self.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn update_balance(&self, uid: &str, balance: i64) -> AppResult<()> {
        let mut user = self
            .users
            .get_mut(uid)
            .ok_or_else(|| AppError::not_found("User"))?;
        user.wallet_balance = Some(balance);
        Ok(())
    }

    async fn place_order(
        &self,
        uid: &str,
        total: i64,
        mut order: Order,
    ) -> AppResult<(i64, String)> {
        let _unit = self.placement.lock();

        if self.fail_next_placement.swap(false, Ordering::SeqCst) {
            return Err(AppError::transaction("store rejected the commit"));
        }

        let new_balance = {
            let mut user = self
                .users
                .get_mut(uid)
                .ok_or_else(|| AppError::transaction("user document missing"))?;
            let balance = user
                .wallet_balance
                .ok_or_else(|| AppError::transaction("wallet not initialized"))?;
            if balance < total {
                return Err(AppError::transaction("balance changed under the order"));
            }
            user.wallet_balance = Some(balance - total);
            balance - total
        };

        let order_id = uuid::Uuid::new_v4().to_string();
        order.id = order_id.clone();
        self.orders.write().push(order);
        drop(_unit);

        self.push_orders();
        Ok((new_balance, order_id))
    }

    async fn get_order(&self, order_id: &str) -> AppResult<Order> {
        self.orders
            .read()
            .iter()
            .find(|o| o.id == order_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Order"))
    }

    async fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> AppResult<()> {
        {
            let mut orders = self.orders.write();
            let order = orders
                .iter_mut()
                .find(|o| o.id == order_id)
                .ok_or_else(|| AppError::not_found("Order"))?;
            order.status = status;
            order.completed_at = completed_at;
        }
        self.push_orders();
        Ok(())
    }

    async fn menu_array_union(&self, canteen_id: &str, item: MenuItem) -> AppResult<()> {
        self.with_canteen(canteen_id, |canteen| {
            // Union by value equality: an identical element is a no-op
            if !canteen.menu.contains(&item) {
                canteen.menu.push(item);
            }
        })?;
        self.push_canteens();
        Ok(())
    }

    async fn menu_array_remove(&self, canteen_id: &str, item: &MenuItem) -> AppResult<()> {
        self.with_canteen(canteen_id, |canteen| {
            canteen.menu.retain(|existing| existing != item);
        })?;
        self.push_canteens();
        Ok(())
    }

    async fn set_menu(&self, canteen_id: &str, menu: Vec<MenuItem>) -> AppResult<()> {
        self.with_canteen(canteen_id, |canteen| canteen.menu = menu)?;
        self.push_canteens();
        Ok(())
    }

    async fn set_canteen_open(&self, canteen_id: &str, is_open: bool) -> AppResult<()> {
        self.with_canteen(canteen_id, |canteen| canteen.is_open = is_open)?;
        self.push_canteens();
        Ok(())
    }
}

/// In-memory identity provider
pub struct MemoryIdentity {
    /// email -> (uid, password)
    accounts: DashMap<String, (String, String)>,
    current: RwLock<Option<AuthUser>>,
    tx: broadcast::Sender<Option<AuthUser>>,
}

impl MemoryIdentity {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(SNAPSHOT_CAPACITY);
        Self {
            accounts: DashMap::new(),
            current: RwLock::new(None),
            tx,
        }
    }

    /// Register an account without signing it in (test setup)
    pub fn seed_account(&self, email: &str, password: &str) -> AuthUser {
        let uid = uuid::Uuid::new_v4().to_string();
        self.accounts
            .insert(email.to_string(), (uid.clone(), password.to_string()));
        AuthUser {
            uid,
            email: email.to_string(),
        }
    }
}

impl Default for MemoryIdentity {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthUser> {
        let account = self
            .accounts
            .get(email)
            .ok_or(AppError::AuthInvalidCredentials)?;
        if account.1 != password {
            return Err(AppError::AuthInvalidCredentials);
        }
        let auth = AuthUser {
            uid: account.0.clone(),
            email: email.to_string(),
        };
        drop(account);
        *self.current.write() = Some(auth.clone());
        let _ = self.tx.send(Some(auth.clone()));
        Ok(auth)
    }

    async fn sign_up(&self, email: &str, password: &str) -> AppResult<AuthUser> {
        if self.accounts.contains_key(email) {
            return Err(AppError::AuthInvalidCredentials);
        }
        let auth = self.seed_account(email, password);
        *self.current.write() = Some(auth.clone());
        let _ = self.tx.send(Some(auth.clone()));
        Ok(auth)
    }

    async fn sign_out(&self) {
        *self.current.write() = None;
        let _ = self.tx.send(None);
    }

    fn subscribe(&self) -> broadcast::Receiver<Option<AuthUser>> {
        self.tx.subscribe()
    }
}

//! Shop and item availability gate
//!
//! Shop-level `is_open` and item-level `available` both default to true
//! when absent; only explicit `false` hides anything. The store's unit
//! of update for per-item edits is the whole menu array, so a toggle
//! rewrites the array with one flag flipped. Item deletion is two-step:
//! the pending removal must be explicitly confirmed before any write.

use std::sync::Arc;

use shared::{AppError, AppResult, Canteen, MenuItem};

use crate::config::ClientConfig;
use crate::store::CanteenStore;

/// Availability gate and menu administration over the store
pub struct AvailabilityGate {
    store: Arc<dyn CanteenStore>,
    default_item_image: String,
}

impl AvailabilityGate {
    pub fn new(store: Arc<dyn CanteenStore>, config: &ClientConfig) -> Self {
        Self {
            store,
            default_item_image: config.default_item_image.clone(),
        }
    }

    /// Whether ordering actions are allowed against this canteen
    pub fn is_open(canteen: &Canteen) -> bool {
        canteen.is_open
    }

    /// The items a student can order: available, matching the search
    /// term (case-insensitive substring), in menu order
    pub fn orderable_items<'a>(canteen: &'a Canteen, search: &str) -> Vec<&'a MenuItem> {
        let needle = search.to_lowercase();
        canteen
            .menu
            .iter()
            .filter(|item| item.available)
            .filter(|item| needle.is_empty() || item.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Add a menu item, defaulting the image when none is given
    pub async fn add_item(
        &self,
        canteen_id: &str,
        name: &str,
        price: i64,
        image: Option<String>,
    ) -> AppResult<()> {
        let item = MenuItem {
            name: name.to_string(),
            price,
            image: image.unwrap_or_else(|| self.default_item_image.clone()),
            available: true,
        };
        self.store
            .menu_array_union(canteen_id, item)
            .await
            .map_err(|e| AppError::store_write(e.to_string()))?;
        tracing::info!(canteen_id, name, price, "Menu item added");
        Ok(())
    }

    /// Flip one item's availability by rewriting the whole menu array
    ///
    /// The name is the de facto key; every item with that name flips.
    pub async fn toggle_item(&self, canteen: &Canteen, name: &str) -> AppResult<()> {
        let menu: Vec<MenuItem> = canteen
            .menu
            .iter()
            .cloned()
            .map(|mut item| {
                if item.name == name {
                    item.available = !item.available;
                }
                item
            })
            .collect();
        self.store
            .set_menu(&canteen.id, menu)
            .await
            .map_err(|e| AppError::store_write(e.to_string()))?;
        tracing::info!(canteen_id = %canteen.id, name, "Item availability toggled");
        Ok(())
    }

    /// Flip the shop's open flag
    pub async fn toggle_shop(&self, canteen: &Canteen) -> AppResult<()> {
        self.store
            .set_canteen_open(&canteen.id, !canteen.is_open)
            .await
            .map_err(|e| AppError::store_write(e.to_string()))?;
        tracing::info!(canteen_id = %canteen.id, is_open = !canteen.is_open, "Shop status toggled");
        Ok(())
    }

    /// Start removing a menu item; nothing is written until the
    /// returned pending removal is confirmed
    pub fn request_removal(&self, canteen_id: &str, item: MenuItem) -> PendingRemoval {
        PendingRemoval {
            store: self.store.clone(),
            canteen_id: canteen_id.to_string(),
            item,
        }
    }
}

/// A menu-item deletion awaiting explicit confirmation
///
/// Dropping it without calling [`confirm`](Self::confirm) cancels the
/// removal; no write is ever issued for an unconfirmed removal.
pub struct PendingRemoval {
    store: Arc<dyn CanteenStore>,
    canteen_id: String,
    item: MenuItem,
}

impl PendingRemoval {
    pub fn item(&self) -> &MenuItem {
        &self.item
    }

    /// Issue the value-equality array remove
    pub async fn confirm(self) -> AppResult<()> {
        self.store
            .menu_array_remove(&self.canteen_id, &self.item)
            .await
            .map_err(|e| AppError::store_write(e.to_string()))?;
        tracing::info!(canteen_id = %self.canteen_id, name = %self.item.name, "Menu item removed");
        Ok(())
    }
}

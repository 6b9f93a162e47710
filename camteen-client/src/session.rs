//! Ephemeral client-side session state
//!
//! The cart holds item snapshots copied at add time; a later menu edit
//! never changes what was already in the cart. Cart and note are cleared
//! on successful placement, logout, and canteen deselection.

use shared::models::MenuItem;

/// Which screen the (out of scope) presentation layer shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    OrderHistory,
    Stats,
}

/// Per-login session state
#[derive(Debug, Default)]
pub struct Session {
    cart: Vec<MenuItem>,
    selected_canteen: Option<String>,
    note: String,
    view: View,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cart(&self) -> &[MenuItem] {
        &self.cart
    }

    pub fn cart_total(&self) -> i64 {
        self.cart.iter().map(|item| item.price).sum()
    }

    /// Copy an item snapshot into the cart
    pub fn add_to_cart(&mut self, item: &MenuItem) {
        self.cart.push(item.clone());
    }

    pub fn selected_canteen(&self) -> Option<&str> {
        self.selected_canteen.as_deref()
    }

    pub fn select_canteen(&mut self, canteen_id: impl Into<String>) {
        self.selected_canteen = Some(canteen_id.into());
    }

    /// Leaving a canteen discards the cart built against its menu
    pub fn deselect_canteen(&mut self) {
        self.selected_canteen = None;
        self.cart.clear();
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = note.into();
    }

    /// The special request, `None` when blank
    pub fn note(&self) -> Option<String> {
        let trimmed = self.note.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    /// Post-placement cleanup: clear cart and note, deselect the
    /// canteen, switch to order history
    pub fn after_placement(&mut self) {
        self.cart.clear();
        self.note.clear();
        self.selected_canteen = None;
        self.view = View::OrderHistory;
    }

    /// Logout cleanup
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

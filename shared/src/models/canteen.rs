//! Canteen and MenuItem Models

use serde::{Deserialize, Serialize};

/// Image applied when a shopkeeper adds an item without one
pub const DEFAULT_ITEM_IMAGE: &str =
    "https://images.unsplash.com/photo-1546069901-ba9599a7e63c?auto=format&fit=crop&w=500&q=60";

fn default_true() -> bool {
    true
}

fn default_image() -> String {
    DEFAULT_ITEM_IMAGE.to_string()
}

/// Menu item entity
///
/// The name is the de facto key within a canteen's menu: toggle and
/// delete operate by value equality since no separate item id exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub name: String,
    /// Price in non-negative integer currency units
    pub price: i64,
    #[serde(default = "default_image")]
    pub image: String,
    /// Absent means available
    #[serde(default = "default_true")]
    pub available: bool,
}

impl MenuItem {
    pub fn new(name: impl Into<String>, price: i64) -> Self {
        Self {
            name: name.into(),
            price,
            image: default_image(),
            available: true,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }
}

/// Canteen entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Canteen {
    /// Server-assigned document id
    pub id: String,
    pub name: String,
    /// Absent means open; only an explicit `false` closes the shop
    #[serde(default = "default_true")]
    pub is_open: bool,
    #[serde(default)]
    pub menu: Vec<MenuItem>,
}

impl Canteen {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_open: true,
            menu: Vec::new(),
        }
    }
}

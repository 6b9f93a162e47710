//! Client configuration
//!
//! All values can be overridden through environment variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | CAMTEEN_SHOPKEEPER_EMAIL | admin@canteen.com | The one shopkeeper account |
//! | CAMTEEN_SIGNUP_BONUS | 5000 | Wallet credit on account creation |
//! | CAMTEEN_NOTICE_DISMISS_SECS | 4 | Auto-dismiss interval for notices |

use shared::models::{Role, DEFAULT_ITEM_IMAGE, SIGNUP_BONUS};

/// Canteen name recorded on orders placed with no canteen selected
pub const FALLBACK_CANTEEN_NAME: &str = "Main Canteen";

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// The single email granted the shopkeeper role; every other
    /// authenticated email is a student
    pub shopkeeper_email: String,
    /// Wallet units credited at signup and on legacy backfill
    pub signup_bonus: i64,
    /// Image URL applied to menu items added without one
    pub default_item_image: String,
    /// Seconds before a transient notice dismisses itself
    pub notice_dismiss_secs: u64,
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset
    pub fn from_env() -> Self {
        Self {
            shopkeeper_email: std::env::var("CAMTEEN_SHOPKEEPER_EMAIL")
                .unwrap_or_else(|_| "admin@canteen.com".into()),
            signup_bonus: std::env::var("CAMTEEN_SIGNUP_BONUS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(SIGNUP_BONUS),
            default_item_image: DEFAULT_ITEM_IMAGE.to_string(),
            notice_dismiss_secs: std::env::var("CAMTEEN_NOTICE_DISMISS_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4),
        }
    }

    /// Set the shopkeeper email
    pub fn with_shopkeeper_email(mut self, email: impl Into<String>) -> Self {
        self.shopkeeper_email = email.into();
        self
    }

    /// Set the signup bonus
    pub fn with_signup_bonus(mut self, units: i64) -> Self {
        self.signup_bonus = units;
        self
    }

    /// Resolve the role for an authenticated email
    pub fn role_for(&self, email: &str) -> Role {
        if email == self.shopkeeper_email {
            Role::Shopkeeper
        } else {
            Role::Student
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

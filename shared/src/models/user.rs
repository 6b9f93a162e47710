//! User Model

use serde::{Deserialize, Serialize};

/// Wallet balance credited once at signup, in integer currency units
pub const SIGNUP_BONUS: i64 = 5000;

/// User role
///
/// The authorization model is a flat allowlist-of-one: a single
/// configured email is the shopkeeper, everyone else is a student.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Shopkeeper,
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// External auth UID (document id)
    pub id: String,
    /// Email — also the key orders are filtered by
    pub email: String,
    pub full_name: String,
    /// Institutional ID
    pub college_id: String,
    #[serde(default)]
    pub role: Role,
    /// `None` on legacy documents predating the wallet; backfilled to
    /// [`SIGNUP_BONUS`] on first observation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_balance: Option<i64>,
}

impl User {
    /// Create a fresh user document with the signup bonus credited
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        full_name: impl Into<String>,
        college_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            full_name: full_name.into(),
            college_id: college_id.into(),
            role: Role::Student,
            wallet_balance: Some(SIGNUP_BONUS),
        }
    }

    /// Whether this is a legacy document missing the wallet field
    pub fn needs_wallet_backfill(&self) -> bool {
        self.wallet_balance.is_none()
    }

    /// Display label shown on orders: "Full Name (ID)", email fallback
    pub fn display_label(&self) -> String {
        if self.full_name.is_empty() {
            self.email.clone()
        } else {
            format!("{} ({})", self.full_name, self.college_id)
        }
    }
}

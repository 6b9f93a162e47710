//! Entity models mirrored from the external document store
//!
//! Documents may predate newer fields (`wallet_balance`, `is_open`,
//! `available`); serde defaults encode the legacy-fill rules.

pub mod canteen;
pub mod user;

pub use canteen::{Canteen, MenuItem, DEFAULT_ITEM_IMAGE};
pub use user::{Role, User, SIGNUP_BONUS};

//! Sign-in / signup flow and role resolution
//!
//! Authentication itself is the identity collaborator's job; this flow
//! only sequences it: signup writes the initial user document with the
//! signup bonus, sign-in loads the profile and backfills a legacy
//! wallet, sign-out resets the session. The authorization model is a
//! flat allowlist-of-one — the configured shopkeeper email.

use std::sync::Arc;

use shared::models::Role;
use shared::{AppError, AppResult, User};

use crate::config::ClientConfig;
use crate::session::Session;
use crate::store::{AuthUser, CanteenStore, IdentityProvider};
use crate::wallet::WalletLedger;

/// Authentication flow over the identity and store collaborators
pub struct AuthFlow {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn CanteenStore>,
    ledger: WalletLedger,
    config: ClientConfig,
}

impl AuthFlow {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn CanteenStore>,
        config: ClientConfig,
    ) -> Self {
        let ledger = WalletLedger::new(store.clone(), config.signup_bonus);
        Self {
            identity,
            store,
            ledger,
            config,
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthUser> {
        let auth = self.identity.sign_in(email, password).await?;
        tracing::info!(email = %auth.email, role = ?self.role_for(&auth.email), "Signed in");
        Ok(auth)
    }

    /// Register an account and write the initial user document
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        confirm_password: &str,
        full_name: &str,
        college_id: &str,
    ) -> AppResult<AuthUser> {
        if password != confirm_password {
            return Err(AppError::PasswordMismatch);
        }
        let auth = self.identity.sign_up(email, password).await?;
        let user = User::new(auth.uid.clone(), email, full_name, college_id);
        self.store.create_user(&user).await?;
        tracing::info!(email = %email, "Account created");
        Ok(auth)
    }

    /// Sign out and discard all session state
    pub async fn sign_out(&self, session: &mut Session) {
        self.identity.sign_out().await;
        session.reset();
    }

    /// Load the user profile for an authenticated principal,
    /// backfilling a legacy wallet on first observation
    ///
    /// The shopkeeper account has no student profile; `None` is normal.
    pub async fn load_profile(&self, auth: &AuthUser) -> AppResult<Option<User>> {
        let Some(mut user) = self.store.get_user(&auth.uid).await? else {
            return Ok(None);
        };
        self.ledger.backfill_if_missing(&mut user).await?;
        Ok(Some(user))
    }

    /// Resolve the role for an authenticated email
    pub fn role_for(&self, email: &str) -> Role {
        self.config.role_for(email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryIdentity, MemoryStore};
    use shared::models::SIGNUP_BONUS;

    fn make_flow() -> (AuthFlow, Arc<MemoryStore>, Arc<MemoryIdentity>) {
        let store = Arc::new(MemoryStore::new());
        let identity = Arc::new(MemoryIdentity::new());
        let config = ClientConfig::from_env().with_shopkeeper_email("admin@canteen.com");
        let flow = AuthFlow::new(identity.clone(), store.clone(), config);
        (flow, store, identity)
    }

    #[tokio::test]
    async fn signup_credits_bonus_and_writes_profile() {
        let (flow, store, _) = make_flow();
        let auth = flow
            .sign_up("asha@campus.edu", "pw", "pw", "Asha Rao", "CS-042")
            .await
            .unwrap();

        let user = store.get_user(&auth.uid).await.unwrap().unwrap();
        assert_eq!(user.wallet_balance, Some(SIGNUP_BONUS));
        assert_eq!(user.display_label(), "Asha Rao (CS-042)");
    }

    #[tokio::test]
    async fn mismatched_passwords_create_nothing() {
        let (flow, _, identity) = make_flow();
        let result = flow
            .sign_up("asha@campus.edu", "pw", "different", "Asha Rao", "CS-042")
            .await;
        assert!(matches!(result, Err(AppError::PasswordMismatch)));
        assert!(matches!(
            identity.sign_in("asha@campus.edu", "pw").await,
            Err(AppError::AuthInvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn load_profile_backfills_legacy_wallet() {
        let (flow, store, identity) = make_flow();
        let auth = identity.seed_account("old@campus.edu", "pw");
        let mut legacy = User::new(auth.uid.clone(), "old@campus.edu", "Old Timer", "EE-001");
        legacy.wallet_balance = None;
        store.seed_user(legacy);

        let user = flow.load_profile(&auth).await.unwrap().unwrap();
        assert_eq!(user.wallet_balance, Some(SIGNUP_BONUS));
    }

    #[tokio::test]
    async fn shopkeeper_has_no_profile() {
        let (flow, _, identity) = make_flow();
        let auth = identity.seed_account("admin@canteen.com", "pw");
        assert_eq!(flow.role_for(&auth.email), Role::Shopkeeper);
        assert!(flow.load_profile(&auth).await.unwrap().is_none());
    }
}

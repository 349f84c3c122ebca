use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::{
    auth::{
        dto::AuthCredentials,
        password::PasswordHasher,
        repo_types::User,
        store::{StoreError, UserStore},
    },
    error::AuthError,
};

/// Hashed against on unknown usernames so both rejection paths cost one hash.
const DUMMY_SALT: &str = "dW5rbm93bnVzZXJzYWx0";

/// Sign-up and credential checks over a user store and a password hasher.
#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn UserStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    /// Hash the password with a fresh salt and persist the new user.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn sign_up(&self, credentials: &AuthCredentials) -> Result<(), AuthError> {
        let salt = self.hasher.gen_salt();
        let password_hash = self.hasher.hash(&credentials.password, &salt)?;
        let user = User::new(&credentials.username, &password_hash, &salt);

        match self.store.save(&user).await {
            Ok(()) => {
                info!(user_id = %user.id, "user signed up");
                Ok(())
            }
            Err(StoreError::UniqueViolation(constraint)) => {
                warn!(%constraint, "username already exists");
                Err(AuthError::Conflict)
            }
            Err(e) => {
                error!(error = %e, "save user failed");
                Err(AuthError::Internal)
            }
        }
    }

    /// `Some(username)` only when the user exists and the password matches.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn validate_user_password(
        &self,
        credentials: &AuthCredentials,
    ) -> Result<Option<String>, AuthError> {
        let user = match self.store.find_one(&credentials.username).await {
            Ok(Some(u)) => u,
            Ok(None) => {
                self.hasher.hash(&credentials.password, DUMMY_SALT)?;
                debug!("unknown username");
                return Ok(None);
            }
            Err(e) => {
                error!(error = %e, "find user failed");
                return Err(AuthError::Internal);
            }
        };

        if user.validate_password(self.hasher.as_ref(), &credentials.password)? {
            Ok(Some(user.username))
        } else {
            debug!(user_id = %user.id, "password mismatch");
            Ok(None)
        }
    }
}

use argon2::{
    password_hash::{PasswordHasher as _, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use thiserror::Error;
use tracing::error;

/// Failure inside the hashing library. Never recovered by callers.
#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct HashError(pub String);

/// Hashing port: salts are generated once per user and fed back on every check.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn gen_salt(&self) -> String;

    /// Deterministic for equal `(plain, salt)` inputs.
    fn hash(&self, plain: &str, salt: &str) -> Result<String, HashError>;
}

/// Argon2id with default parameters, output in PHC string format.
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn gen_salt(&self) -> String {
        SaltString::generate(&mut OsRng).as_str().to_owned()
    }

    fn hash(&self, plain: &str, salt: &str) -> Result<String, HashError> {
        let salt = SaltString::from_b64(salt).map_err(|e| {
            error!(error = %e, "argon2 salt parse error");
            HashError(e.to_string())
        })?;
        let hash = Argon2::default()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                HashError(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }
}

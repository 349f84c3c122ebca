use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::password::{HashError, PasswordHasher};

/// User record in the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: Uuid,         // unique user ID
    pub username: String, // unique login name
    pub password: String, // hash of password + salt, never plaintext
    pub salt: String,     // fixed per user
}

impl User {
    /// Build an unsaved record with a freshly generated id.
    pub fn new(username: &str, password_hash: &str, salt: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.to_owned(),
            password: password_hash.to_owned(),
            salt: salt.to_owned(),
        }
    }

    /// Re-hash `candidate` with the stored salt and compare against the stored hash.
    pub fn validate_password(
        &self,
        hasher: &dyn PasswordHasher,
        candidate: &str,
    ) -> Result<bool, HashError> {
        let hash = hasher.hash(candidate, &self.salt)?;
        Ok(constant_time_eq(&hash, &self.password))
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Request body for sign-up and sign-in.
#[derive(Clone, Deserialize)]
pub struct AuthCredentials {
    pub username: String,
    pub password: String,
}

#[cfg(test)]
impl AuthCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for AuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Response body for a successful sign-in.
#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub username: String,
}

/// 4 to 20 characters, no whitespace.
pub(crate) fn is_valid_username(username: &str) -> bool {
    lazy_static! {
        static ref USERNAME_RE: Regex = Regex::new(r"^\S{4,20}$").unwrap();
    }
    USERNAME_RE.is_match(username)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_bounds() {
        assert!(is_valid_username("alice"));
        assert!(is_valid_username("abcd"));
        assert!(is_valid_username("a".repeat(20).as_str()));
        assert!(!is_valid_username("abc"));
        assert!(!is_valid_username("a".repeat(21).as_str()));
        assert!(!is_valid_username("al ice"));
        assert!(!is_valid_username(""));
    }

    #[test]
    fn debug_hides_password() {
        let creds = AuthCredentials::new("alice", "s3cret");
        let out = format!("{:?}", creds);
        assert!(out.contains("alice"));
        assert!(!out.contains("s3cret"));
    }

    #[test]
    fn sign_in_response_serialization() {
        let json = serde_json::to_string(&SignInResponse { username: "alice".into() }).unwrap();
        assert_eq!(json, r#"{"username":"alice"}"#);
    }
}

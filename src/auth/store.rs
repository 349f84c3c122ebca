use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::auth::repo_types::User;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Persistence port for user records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new record. Duplicate usernames yield `StoreError::UniqueViolation`.
    async fn save(&self, user: &User) -> Result<(), StoreError>;

    /// Exact-match lookup by username.
    async fn find_one(&self, username: &str) -> Result<Option<User>, StoreError>;
}

#[derive(Debug, Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn save(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, password, salt)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.salt)
        .execute(&self.db)
        .await
        .map_err(map_insert_error)?;
        Ok(())
    }

    async fn find_one(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, salt
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }
}

fn map_insert_error(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            let constraint = db_err.constraint().unwrap_or("users").to_string();
            StoreError::UniqueViolation(constraint)
        }
        _ => StoreError::Database(e),
    }
}


#[cfg(test)]
mod tests {
    use super::memory::MemoryUserStore;
    use super::*;

    #[tokio::test]
    async fn memory_store_rejects_duplicate_username() {
        let store = MemoryUserStore::new();
        let first = User::new("alice", "h1", "s1");
        let second = User::new("alice", "h2", "s2");

        store.save(&first).await.expect("first save");
        let err = store.save(&second).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)));
        assert_eq!(store.len().await, 1);
        assert_eq!(store.find_one("alice").await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn memory_store_lookup_is_exact() {
        let store = MemoryUserStore::new();
        store.save(&User::new("alice", "h", "s")).await.unwrap();

        assert!(store.find_one("Alice").await.unwrap().is_none());
        assert!(store.find_one("bob").await.unwrap().is_none());
    }

    #[derive(Debug)]
    struct DuplicateUsername;

    impl std::fmt::Display for DuplicateUsername {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("duplicate key value violates unique constraint \"users_username_key\"")
        }
    }

    impl std::error::Error for DuplicateUsername {}

    impl sqlx::error::DatabaseError for DuplicateUsername {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint \"users_username_key\""
        }

        fn code(&self) -> Option<std::borrow::Cow<'_, str>> {
            Some("23505".into())
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn constraint(&self) -> Option<&str> {
            Some("users_username_key")
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::UniqueViolation
        }
    }

    fn duplicate_username_error() -> sqlx::Error {
        sqlx::Error::Database(Box::new(DuplicateUsername))
    }

    #[test]
    fn unique_violation_maps_to_constraint_name() {
        match map_insert_error(duplicate_username_error()) {
            StoreError::UniqueViolation(constraint) => assert_eq!(constraint, "users_username_key"),
            other => panic!("expected unique violation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn postgres_duplicate_surfaces_as_conflict() {
        use crate::auth::{
            dto::AuthCredentials, password::Argon2Hasher, repo::UserRepository,
        };
        use crate::error::AuthError;
        use std::sync::Arc;

        let mut store = MockUserStore::new();
        store
            .expect_save()
            .times(1)
            .returning(|_| Err(map_insert_error(duplicate_username_error())));
        let repo = UserRepository::new(Arc::new(store), Arc::new(Argon2Hasher));

        let err = repo
            .sign_up(&AuthCredentials::new("alice", "s3cret"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
    }

    #[test]
    fn non_database_errors_are_not_conflicts() {
        let err = map_insert_error(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Database(_)));
    }
}

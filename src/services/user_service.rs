use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::User;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database manager error: {0}")]
    DatabaseManager(#[from] DatabaseError),
    #[error("Email already registered: {0}")]
    EmailTaken(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid {0}")]
    InvalidField(&'static str),
}

pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub async fn new() -> Result<Self, UserError> {
        let pool = DatabaseManager::main_pool().await?;
        Ok(Self { pool })
    }

    pub async fn register(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<User, UserError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(UserError::InvalidField("email"));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(UserError::InvalidField("name"));
        }
        if password.len() < 8 {
            return Err(UserError::InvalidField("password (minimum 8 characters)"));
        }

        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(&email)
            .fetch_one(&self.pool)
            .await?;
        if exists > 0 {
            return Err(UserError::EmailTaken(email));
        }

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, password_digest)
            VALUES ($1, $2, $3)
            RETURNING id, email, name, password_digest, created_at
            "#,
        )
        .bind(&email)
        .bind(name)
        .bind(digest_password(password))
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Check credentials. Returns the user on success; any mismatch or
    /// unknown email collapses into the same InvalidCredentials error so the
    /// response does not reveal which part was wrong.
    pub async fn verify(&self, email: &str, password: &str) -> Result<User, UserError> {
        let email = email.trim().to_lowercase();
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, password_digest, created_at FROM users WHERE email = $1",
        )
        .bind(&email)
        .fetch_optional(&self.pool)
        .await?;

        match user {
            Some(user) if user.password_digest == digest_password(password) => Ok(user),
            _ => Err(UserError::InvalidCredentials),
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<User>, UserError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, password_digest, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

/// SHA-256 hex digest of the password.
fn digest_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic_and_hex() {
        let a = digest_password("correct horse battery staple");
        let b = digest_password("correct horse battery staple");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn different_passwords_differ() {
        assert_ne!(digest_password("one"), digest_password("two"));
    }
}

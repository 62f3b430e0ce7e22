use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Membership, Role};

#[derive(Debug, thiserror::Error)]
pub enum MembershipError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database manager error: {0}")]
    DatabaseManager(#[from] DatabaseError),
    #[error("User not found: {0}")]
    UserNotFound(String),
}

/// Membership joined with the member's identity, for roster listings.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RosterEntry {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Roster administration for one (church, service) pair.
pub struct MembershipService {
    pool: PgPool,
}

impl MembershipService {
    pub async fn new() -> Result<Self, MembershipError> {
        let pool = DatabaseManager::main_pool().await?;
        Ok(Self { pool })
    }

    /// Grant a role, upserting over any existing assignment for the triple.
    pub async fn grant(
        &self,
        church_id: Uuid,
        service_id: Uuid,
        user_id: Uuid,
        role: Role,
    ) -> Result<Membership, MembershipError> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO service_memberships (church_id, service_id, user_id, role)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (church_id, service_id, user_id)
            DO UPDATE SET role = EXCLUDED.role
            RETURNING id, church_id, service_id, user_id, role, created_at
            "#,
        )
        .bind(church_id)
        .bind(service_id)
        .bind(user_id)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(membership)
    }

    /// Remove an assignment. Returns true if a row existed. After a revoke
    /// the user resolves to viewer again - absence of a row is the default.
    pub async fn revoke(
        &self,
        church_id: Uuid,
        service_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, MembershipError> {
        let result = sqlx::query(
            r#"
            DELETE FROM service_memberships
            WHERE church_id = $1 AND service_id = $2 AND user_id = $3
            "#,
        )
        .bind(church_id)
        .bind(service_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn roster(
        &self,
        church_id: Uuid,
        service_id: Uuid,
    ) -> Result<Vec<RosterEntry>, MembershipError> {
        let entries = sqlx::query_as::<_, RosterEntry>(
            r#"
            SELECT m.user_id, u.email, u.name, m.role, m.created_at
            FROM service_memberships m
            JOIN users u ON u.id = m.user_id
            WHERE m.church_id = $1 AND m.service_id = $2
            ORDER BY u.name
            "#,
        )
        .bind(church_id)
        .bind(service_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Look up a user id by email for grant-by-email flows.
    pub async fn user_id_by_email(&self, email: &str) -> Result<Uuid, MembershipError> {
        let id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await?;

        id.ok_or_else(|| MembershipError::UserNotFound(email.to_string()))
    }
}

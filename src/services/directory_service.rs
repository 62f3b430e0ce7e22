use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::church::{normalize_slug, Church, ChurchService};

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database manager error: {0}")]
    DatabaseManager(#[from] DatabaseError),
    #[error("Church already exists: {0}")]
    ChurchExists(String),
    #[error("Service already exists: {0}")]
    ServiceExists(String),
    #[error("Invalid slug: {0}")]
    InvalidSlug(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Read seam for the role resolution chain. The resolver depends on this
/// rather than on the database directly, which keeps its fail-closed
/// behavior testable without a live Postgres.
#[async_trait]
pub trait DirectoryLookup: Send + Sync {
    async fn church_by_slug(&self, slug: &str) -> Result<Option<Church>, DirectoryError>;

    /// Always scoped by the resolved church id. Service slugs are only
    /// unique within a church, so a slug-only lookup would cross tenants.
    async fn service_by_slug(
        &self,
        church_id: Uuid,
        slug: &str,
    ) -> Result<Option<ChurchService>, DirectoryError>;

    /// Raw stored role for the (church, service, user) triple, if any.
    async fn membership_role(
        &self,
        church_id: Uuid,
        service_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<String>, DirectoryError>;
}

/// Catalog of churches and their services.
pub struct DirectoryService {
    pool: PgPool,
}

impl DirectoryService {
    pub async fn new() -> Result<Self, DirectoryError> {
        let pool = DatabaseManager::main_pool().await?;
        Ok(Self { pool })
    }

    /// Create a church. The slug is normalized before storage so lookups and
    /// creation agree on canonical form.
    pub async fn create_church(&self, slug: &str, name: &str) -> Result<Church, DirectoryError> {
        let slug = normalize_slug(slug);
        Self::validate_slug(&slug)?;

        if self.church_by_slug(&slug).await?.is_some() {
            return Err(DirectoryError::ChurchExists(slug));
        }

        let church = sqlx::query_as::<_, Church>(
            r#"
            INSERT INTO churches (slug, name)
            VALUES ($1, $2)
            RETURNING id, slug, name, created_at, updated_at
            "#,
        )
        .bind(&slug)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(church)
    }

    pub async fn list_churches(&self) -> Result<Vec<Church>, DirectoryError> {
        let churches = sqlx::query_as::<_, Church>(
            "SELECT id, slug, name, created_at, updated_at FROM churches ORDER BY slug",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(churches)
    }

    pub async fn create_service(
        &self,
        church_id: Uuid,
        slug: &str,
        name: &str,
    ) -> Result<ChurchService, DirectoryError> {
        let slug = normalize_slug(slug);
        Self::validate_slug(&slug)?;

        if self.service_by_slug(church_id, &slug).await?.is_some() {
            return Err(DirectoryError::ServiceExists(slug));
        }

        let service = sqlx::query_as::<_, ChurchService>(
            r#"
            INSERT INTO church_services (church_id, slug, name)
            VALUES ($1, $2, $3)
            RETURNING id, church_id, slug, name, created_at
            "#,
        )
        .bind(church_id)
        .bind(&slug)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(service)
    }

    pub async fn list_services(&self, church_id: Uuid) -> Result<Vec<ChurchService>, DirectoryError> {
        let services = sqlx::query_as::<_, ChurchService>(
            r#"
            SELECT id, church_id, slug, name, created_at
            FROM church_services
            WHERE church_id = $1
            ORDER BY slug
            "#,
        )
        .bind(church_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    /// Resolve a church by slug or fail with NotFound. Convenience for
    /// handlers that cannot proceed without one.
    pub async fn require_church(&self, slug: &str) -> Result<Church, DirectoryError> {
        self.church_by_slug(slug)
            .await?
            .ok_or_else(|| DirectoryError::NotFound(format!("church '{}'", slug)))
    }

    pub async fn require_service(
        &self,
        church_id: Uuid,
        slug: &str,
    ) -> Result<ChurchService, DirectoryError> {
        self.service_by_slug(church_id, slug)
            .await?
            .ok_or_else(|| DirectoryError::NotFound(format!("service '{}'", slug)))
    }

    /// Slugs must survive being part of a URL path: lowercase alphanumerics,
    /// hyphens and underscores, between 2 and 64 characters.
    fn validate_slug(slug: &str) -> Result<(), DirectoryError> {
        if slug.len() < 2 || slug.len() > 64 {
            return Err(DirectoryError::InvalidSlug(format!(
                "'{}' must be between 2 and 64 characters",
                slug
            )));
        }
        if !slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        {
            return Err(DirectoryError::InvalidSlug(format!(
                "'{}' may only contain lowercase letters, digits, hyphens, and underscores",
                slug
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl DirectoryLookup for DirectoryService {
    async fn church_by_slug(&self, slug: &str) -> Result<Option<Church>, DirectoryError> {
        let slug = normalize_slug(slug);
        let church = sqlx::query_as::<_, Church>(
            "SELECT id, slug, name, created_at, updated_at FROM churches WHERE slug = $1",
        )
        .bind(&slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(church)
    }

    async fn service_by_slug(
        &self,
        church_id: Uuid,
        slug: &str,
    ) -> Result<Option<ChurchService>, DirectoryError> {
        let service = sqlx::query_as::<_, ChurchService>(
            r#"
            SELECT id, church_id, slug, name, created_at
            FROM church_services
            WHERE church_id = $1 AND slug = $2
            "#,
        )
        .bind(church_id)
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(service)
    }

    async fn membership_role(
        &self,
        church_id: Uuid,
        service_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<String>, DirectoryError> {
        let role = sqlx::query_scalar::<_, String>(
            r#"
            SELECT role
            FROM service_memberships
            WHERE church_id = $1 AND service_id = $2 AND user_id = $3
            "#,
        )
        .bind(church_id)
        .bind(service_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_slugs() {
        assert!(DirectoryService::validate_slug("riverside").is_ok());
        assert!(DirectoryService::validate_slug("next-step_2").is_ok());
        assert!(DirectoryService::validate_slug("a").is_err());
        assert!(DirectoryService::validate_slug("Has Spaces").is_err());
        assert!(DirectoryService::validate_slug("UPPER").is_err());
    }
}

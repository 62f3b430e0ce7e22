use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Prayer, PrayerStatus};
use crate::filter::{Bind, FilterError, PrayerQuery};

#[derive(Debug, thiserror::Error)]
pub enum PrayerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database manager error: {0}")]
    DatabaseManager(#[from] DatabaseError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error("Prayer not found: {0}")]
    NotFound(Uuid),
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

pub struct PrayerService {
    pool: PgPool,
}

impl PrayerService {
    pub async fn new() -> Result<Self, PrayerError> {
        let pool = DatabaseManager::main_pool().await?;
        Ok(Self { pool })
    }

    /// Submit a new prayer to a board. Anonymous submissions are allowed;
    /// the author name is whatever the submitter wrote on the form.
    pub async fn submit(
        &self,
        church_id: Uuid,
        service_id: Uuid,
        author_name: &str,
        body: &str,
        category: Option<&str>,
        status: PrayerStatus,
    ) -> Result<Prayer, PrayerError> {
        let author_name = author_name.trim();
        let body = body.trim();
        if author_name.is_empty() {
            return Err(PrayerError::MissingField("author_name"));
        }
        if body.is_empty() {
            return Err(PrayerError::MissingField("body"));
        }
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or("other");

        let prayer = sqlx::query_as::<_, Prayer>(
            r#"
            INSERT INTO prayers (church_id, service_id, author_name, body, category, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, church_id, service_id, author_name, body, category, status,
                      created_at, updated_at
            "#,
        )
        .bind(church_id)
        .bind(service_id)
        .bind(author_name)
        .bind(body)
        .bind(category)
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(prayer)
    }

    /// One filtered, sorted page of a board plus the total count for the
    /// same filters.
    pub async fn list(
        &self,
        church_id: Uuid,
        service_id: Uuid,
        query: &PrayerQuery,
    ) -> Result<(Vec<Prayer>, i64), PrayerError> {
        // $1 and $2 are the board scope; filter placeholders continue at $3
        let sql = query.to_sql(3)?;

        let select = format!(
            "SELECT id, church_id, service_id, author_name, body, category, status, \
             created_at, updated_at FROM prayers \
             WHERE church_id = $1 AND service_id = $2{} {} {}",
            sql.conditions, sql.order_by, sql.limit
        );
        let count = format!(
            "SELECT COUNT(*) FROM prayers WHERE church_id = $1 AND service_id = $2{}",
            sql.conditions
        );

        let mut page_query = sqlx::query_as::<_, Prayer>(&select)
            .bind(church_id)
            .bind(service_id);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count)
            .bind(church_id)
            .bind(service_id);
        for bind in &sql.binds {
            match bind {
                Bind::Text(value) => {
                    page_query = page_query.bind(value.clone());
                    count_query = count_query.bind(value.clone());
                }
                Bind::Time(value) => {
                    page_query = page_query.bind(*value);
                    count_query = count_query.bind(*value);
                }
            }
        }

        let prayers = page_query.fetch_all(&self.pool).await?;
        let total = count_query.fetch_one(&self.pool).await?;

        Ok((prayers, total))
    }

    pub async fn get(&self, id: Uuid) -> Result<Prayer, PrayerError> {
        let prayer = sqlx::query_as::<_, Prayer>(
            r#"
            SELECT id, church_id, service_id, author_name, body, category, status,
                   created_at, updated_at
            FROM prayers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        prayer.ok_or(PrayerError::NotFound(id))
    }

    /// Edit body and/or category. Fields left as None keep their value.
    pub async fn update(
        &self,
        id: Uuid,
        body: Option<&str>,
        category: Option<&str>,
    ) -> Result<Prayer, PrayerError> {
        let prayer = sqlx::query_as::<_, Prayer>(
            r#"
            UPDATE prayers
            SET body = COALESCE($2, body),
                category = COALESCE($3, category),
                updated_at = now()
            WHERE id = $1
            RETURNING id, church_id, service_id, author_name, body, category, status,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(body.map(str::trim).filter(|b| !b.is_empty()))
        .bind(category.map(str::trim).filter(|c| !c.is_empty()))
        .fetch_optional(&self.pool)
        .await?;

        prayer.ok_or(PrayerError::NotFound(id))
    }

    /// Unconditional status write. Setting the current status again is a
    /// no-op in effect, which makes the two transitions symmetric and safely
    /// retryable.
    pub async fn set_status(&self, id: Uuid, status: PrayerStatus) -> Result<Prayer, PrayerError> {
        let prayer = sqlx::query_as::<_, Prayer>(
            r#"
            UPDATE prayers
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, church_id, service_id, author_name, body, category, status,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        prayer.ok_or(PrayerError::NotFound(id))
    }

    /// All prayer ids for one church, used to scope the bulk reaction map
    /// to the board being viewed.
    pub async fn ids_for_church(&self, church_id: Uuid) -> Result<Vec<Uuid>, PrayerError> {
        let ids = sqlx::query_scalar::<_, Uuid>("SELECT id FROM prayers WHERE church_id = $1")
            .bind(church_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(ids)
    }

    /// Returns true if a row was deleted. Reactions go with the prayer via
    /// the foreign key cascade.
    pub async fn delete(&self, id: Uuid) -> Result<bool, PrayerError> {
        let result = sqlx::query("DELETE FROM prayers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

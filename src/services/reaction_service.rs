use async_trait::async_trait;
use tracing::warn;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::realtime::event::ChangeEvent;
use crate::realtime::hub::FeedHub;

#[derive(Debug, thiserror::Error)]
pub enum ReactionError {
    #[error("Sign in to support a prayer")]
    Unauthenticated,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database manager error: {0}")]
    DatabaseManager(#[from] DatabaseError),
    #[error("Reaction store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence seam for reaction rows. The aggregator depends on this trait,
/// not on sqlx, so its convergence properties are testable with an in-memory
/// double.
#[async_trait]
pub trait ReactionStore: Send + Sync {
    /// Every (prayer_id, user_id) pair currently stored.
    async fn load_all(&self) -> Result<Vec<(Uuid, Uuid)>, ReactionError>;

    async fn insert(&self, prayer_id: Uuid, user_id: Uuid) -> Result<(), ReactionError>;

    async fn delete(&self, prayer_id: Uuid, user_id: Uuid) -> Result<(), ReactionError>;
}

/// SQL-backed store. Writes are idempotent at the database level (the unique
/// (prayer_id, user_id) constraint plus ON CONFLICT DO NOTHING), and every
/// successful write is announced to the local hub and to the Postgres NOTIFY
/// channel for other server processes.
pub struct SqlReactionStore;

impl SqlReactionStore {
    pub fn new() -> Self {
        Self
    }

    async fn announce(&self, event: ChangeEvent) {
        FeedHub::global().publish(event);

        // NOTIFY is best-effort: the row change is already committed, and
        // every consumer can recover through a bulk reload.
        let payload = match serde_json::to_string(&event) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Could not serialize reaction event: {}", e);
                return;
            }
        };

        let channel = &crate::config::config().feed.pg_channel;
        match DatabaseManager::main_pool().await {
            Ok(pool) => {
                if let Err(e) = sqlx::query("SELECT pg_notify($1, $2)")
                    .bind(channel)
                    .bind(&payload)
                    .execute(&pool)
                    .await
                {
                    warn!("pg_notify on '{}' failed: {}", channel, e);
                }
            }
            Err(e) => warn!("pg_notify skipped, no pool: {}", e),
        }
    }
}

impl Default for SqlReactionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReactionStore for SqlReactionStore {
    async fn load_all(&self) -> Result<Vec<(Uuid, Uuid)>, ReactionError> {
        let pool = DatabaseManager::main_pool().await?;
        let rows = sqlx::query_as::<_, (Uuid, Uuid)>(
            "SELECT prayer_id, user_id FROM prayer_reactions",
        )
        .fetch_all(&pool)
        .await?;

        Ok(rows)
    }

    async fn insert(&self, prayer_id: Uuid, user_id: Uuid) -> Result<(), ReactionError> {
        let pool = DatabaseManager::main_pool().await?;
        sqlx::query(
            r#"
            INSERT INTO prayer_reactions (prayer_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (prayer_id, user_id) DO NOTHING
            "#,
        )
        .bind(prayer_id)
        .bind(user_id)
        .execute(&pool)
        .await?;

        self.announce(ChangeEvent::insert(prayer_id, user_id)).await;
        Ok(())
    }

    async fn delete(&self, prayer_id: Uuid, user_id: Uuid) -> Result<(), ReactionError> {
        let pool = DatabaseManager::main_pool().await?;
        sqlx::query("DELETE FROM prayer_reactions WHERE prayer_id = $1 AND user_id = $2")
            .bind(prayer_id)
            .bind(user_id)
            .execute(&pool)
            .await?;

        self.announce(ChangeEvent::delete(prayer_id, user_id)).await;
        Ok(())
    }
}

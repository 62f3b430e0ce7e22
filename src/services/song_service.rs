use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::Song;

#[derive(Debug, thiserror::Error)]
pub enum SongError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database manager error: {0}")]
    DatabaseManager(#[from] DatabaseError),
    #[error("Song not found: {0}")]
    NotFound(Uuid),
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// Worship song catalog for a church.
pub struct SongService {
    pool: PgPool,
}

impl SongService {
    pub async fn new() -> Result<Self, SongError> {
        let pool = DatabaseManager::main_pool().await?;
        Ok(Self { pool })
    }

    pub async fn create(
        &self,
        church_id: Uuid,
        title: &str,
        author: Option<&str>,
        lyrics: &str,
        song_key: Option<&str>,
        tempo: Option<&str>,
    ) -> Result<Song, SongError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(SongError::MissingField("title"));
        }

        let song = sqlx::query_as::<_, Song>(
            r#"
            INSERT INTO songs (church_id, title, author, lyrics, song_key, tempo)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, church_id, title, author, lyrics, song_key, tempo,
                      created_at, updated_at
            "#,
        )
        .bind(church_id)
        .bind(title)
        .bind(author)
        .bind(lyrics)
        .bind(song_key)
        .bind(tempo)
        .fetch_one(&self.pool)
        .await?;

        Ok(song)
    }

    pub async fn list(&self, church_id: Uuid) -> Result<Vec<Song>, SongError> {
        let songs = sqlx::query_as::<_, Song>(
            r#"
            SELECT id, church_id, title, author, lyrics, song_key, tempo,
                   created_at, updated_at
            FROM songs
            WHERE church_id = $1
            ORDER BY title
            "#,
        )
        .bind(church_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(songs)
    }

    pub async fn get(&self, id: Uuid) -> Result<Song, SongError> {
        let song = sqlx::query_as::<_, Song>(
            r#"
            SELECT id, church_id, title, author, lyrics, song_key, tempo,
                   created_at, updated_at
            FROM songs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        song.ok_or(SongError::NotFound(id))
    }

    pub async fn update(
        &self,
        id: Uuid,
        title: Option<&str>,
        author: Option<&str>,
        lyrics: Option<&str>,
        song_key: Option<&str>,
        tempo: Option<&str>,
    ) -> Result<Song, SongError> {
        let song = sqlx::query_as::<_, Song>(
            r#"
            UPDATE songs
            SET title = COALESCE($2, title),
                author = COALESCE($3, author),
                lyrics = COALESCE($4, lyrics),
                song_key = COALESCE($5, song_key),
                tempo = COALESCE($6, tempo),
                updated_at = now()
            WHERE id = $1
            RETURNING id, church_id, title, author, lyrics, song_key, tempo,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title.map(str::trim).filter(|t| !t.is_empty()))
        .bind(author)
        .bind(lyrics)
        .bind(song_key)
        .bind(tempo)
        .fetch_optional(&self.pool)
        .await?;

        song.ok_or(SongError::NotFound(id))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, SongError> {
        let result = sqlx::query("DELETE FROM songs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

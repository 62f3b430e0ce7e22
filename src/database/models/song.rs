use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A worship song with lyrics, managed by the church's worship team.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Song {
    pub id: Uuid,
    pub church_id: Uuid,
    pub title: String,
    pub author: Option<String>,
    pub lyrics: String,
    pub song_key: Option<String>,
    pub tempo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

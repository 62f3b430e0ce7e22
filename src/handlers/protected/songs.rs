use axum::extract::{Extension, Path};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::Song;
use crate::handlers::access::{require_module_admin, WORSHIP_MODULE};
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::directory_service::DirectoryService;
use crate::services::song_service::SongService;

#[derive(Debug, Deserialize)]
pub struct CreateSong {
    pub title: String,
    pub author: Option<String>,
    #[serde(default)]
    pub lyrics: String,
    pub song_key: Option<String>,
    pub tempo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditSong {
    pub title: Option<String>,
    pub author: Option<String>,
    pub lyrics: Option<String>,
    pub song_key: Option<String>,
    pub tempo: Option<String>,
}

/// POST /api/churches/:church/songs - Add a song to the worship songbook.
pub async fn create(
    Extension(user): Extension<AuthUser>,
    Path(church): Path<String>,
    Json(payload): Json<CreateSong>,
) -> ApiResult<Song> {
    let directory = DirectoryService::new().await?;
    let church = directory.require_church(&church).await?;
    require_module_admin(church.id, WORSHIP_MODULE, &user).await?;

    let song = SongService::new()
        .await?
        .create(
            church.id,
            &payload.title,
            payload.author.as_deref(),
            &payload.lyrics,
            payload.song_key.as_deref(),
            payload.tempo.as_deref(),
        )
        .await?;

    Ok(ApiResponse::created(song))
}

/// PUT /api/songs/:id - Edit a song.
pub async fn update(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EditSong>,
) -> ApiResult<Song> {
    let songs = SongService::new().await?;
    let song = songs.get(id).await?;
    require_module_admin(song.church_id, WORSHIP_MODULE, &user).await?;

    let song = songs
        .update(
            id,
            payload.title.as_deref(),
            payload.author.as_deref(),
            payload.lyrics.as_deref(),
            payload.song_key.as_deref(),
            payload.tempo.as_deref(),
        )
        .await?;

    Ok(ApiResponse::ok(song))
}

/// DELETE /api/songs/:id
pub async fn delete(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    let songs = SongService::new().await?;
    let song = songs.get(id).await?;
    require_module_admin(song.church_id, WORSHIP_MODULE, &user).await?;

    songs.delete(id).await?;
    Ok(ApiResponse::ok(json!({ "deleted": id })))
}

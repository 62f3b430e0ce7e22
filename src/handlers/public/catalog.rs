use axum::extract::Path;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::{Course, Song};
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::course_service::CourseService;
use crate::services::directory_service::DirectoryService;
use crate::services::song_service::SongService;

/// GET /churches/:church/songs - Worship songbook.
pub async fn list_songs(Path(church): Path<String>) -> ApiResult<Vec<Song>> {
    let directory = DirectoryService::new().await?;
    let church = directory.require_church(&church).await?;

    let songs = SongService::new().await?.list(church.id).await?;
    Ok(ApiResponse::ok(songs))
}

/// GET /songs/:id - One song with full lyrics.
pub async fn get_song(Path(id): Path<Uuid>) -> ApiResult<Song> {
    let song = SongService::new().await?.get(id).await?;
    Ok(ApiResponse::ok(song))
}

/// GET /churches/:church/courses - Discipleship course library.
pub async fn list_courses(Path(church): Path<String>) -> ApiResult<Vec<Course>> {
    let directory = DirectoryService::new().await?;
    let church = directory.require_church(&church).await?;

    let courses = CourseService::new().await?.list_courses(church.id).await?;
    Ok(ApiResponse::ok(courses))
}

/// GET /courses/:id - A course together with its ordered lessons.
pub async fn get_course(Path(id): Path<Uuid>) -> ApiResult<Value> {
    let courses = CourseService::new().await?;
    let course = courses.get_course(id).await?;
    let lessons = courses.list_lessons(id).await?;

    Ok(ApiResponse::ok(json!({
        "course": course,
        "lessons": lessons,
    })))
}

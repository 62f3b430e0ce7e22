use axum::extract::{Extension, Path};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::{Course, Lesson};
use crate::handlers::access::{require_module_admin, DISCIPLESHIP_MODULE};
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::course_service::CourseService;
use crate::services::directory_service::DirectoryService;

#[derive(Debug, Deserialize)]
pub struct CreateCourse {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub position: i32,
}

#[derive(Debug, Deserialize)]
pub struct EditCourse {
    pub title: Option<String>,
    pub description: Option<String>,
    pub position: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateLesson {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub position: i32,
}

#[derive(Debug, Deserialize)]
pub struct EditLesson {
    pub title: Option<String>,
    pub content: Option<String>,
    pub position: Option<i32>,
}

/// POST /api/churches/:church/courses - Create a discipleship course on the
/// church's discipleship module.
pub async fn create_course(
    Extension(user): Extension<AuthUser>,
    Path(church): Path<String>,
    Json(payload): Json<CreateCourse>,
) -> ApiResult<Course> {
    let directory = DirectoryService::new().await?;
    let church = directory.require_church(&church).await?;
    require_module_admin(church.id, DISCIPLESHIP_MODULE, &user).await?;

    let service = directory
        .require_service(church.id, DISCIPLESHIP_MODULE)
        .await?;

    let course = CourseService::new()
        .await?
        .create_course(
            church.id,
            service.id,
            &payload.title,
            payload.description.as_deref(),
            payload.position,
        )
        .await?;

    Ok(ApiResponse::created(course))
}

/// PUT /api/courses/:id
pub async fn update_course(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EditCourse>,
) -> ApiResult<Course> {
    let courses = CourseService::new().await?;
    let course = courses.get_course(id).await?;
    require_module_admin(course.church_id, DISCIPLESHIP_MODULE, &user).await?;

    let course = courses
        .update_course(
            id,
            payload.title.as_deref(),
            payload.description.as_deref(),
            payload.position,
        )
        .await?;

    Ok(ApiResponse::ok(course))
}

/// DELETE /api/courses/:id - Remove a course and its lessons.
pub async fn delete_course(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    let courses = CourseService::new().await?;
    let course = courses.get_course(id).await?;
    require_module_admin(course.church_id, DISCIPLESHIP_MODULE, &user).await?;

    courses.delete_course(id).await?;
    Ok(ApiResponse::ok(json!({ "deleted": id })))
}

/// POST /api/courses/:id/lessons - Append a lesson to a course.
pub async fn create_lesson(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateLesson>,
) -> ApiResult<Lesson> {
    let courses = CourseService::new().await?;
    let course = courses.get_course(id).await?;
    require_module_admin(course.church_id, DISCIPLESHIP_MODULE, &user).await?;

    let lesson = courses
        .create_lesson(id, &payload.title, &payload.content, payload.position)
        .await?;

    Ok(ApiResponse::created(lesson))
}

/// PUT /api/lessons/:id
pub async fn update_lesson(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EditLesson>,
) -> ApiResult<Lesson> {
    let courses = CourseService::new().await?;
    let lesson = courses.get_lesson(id).await?;
    let course = courses.get_course(lesson.course_id).await?;
    require_module_admin(course.church_id, DISCIPLESHIP_MODULE, &user).await?;

    let lesson = courses
        .update_lesson(
            id,
            payload.title.as_deref(),
            payload.content.as_deref(),
            payload.position,
        )
        .await?;

    Ok(ApiResponse::ok(lesson))
}

/// DELETE /api/lessons/:id
pub async fn delete_lesson(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    let courses = CourseService::new().await?;
    let lesson = courses.get_lesson(id).await?;
    let course = courses.get_course(lesson.course_id).await?;
    require_module_admin(course.church_id, DISCIPLESHIP_MODULE, &user).await?;

    courses.delete_lesson(id).await?;
    Ok(ApiResponse::ok(json!({ "deleted": id })))
}
